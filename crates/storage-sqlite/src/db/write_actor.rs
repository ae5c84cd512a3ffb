use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use fxrates_core::errors::{DatabaseError, Result};
use log::error;
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// A job runs against the writer's connection and returns a core Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type AnyResult = Result<Box<dyn Any + Send + 'static>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    // Job plus the oneshot used for the reply; the return type is erased.
    tx: mpsc::Sender<(Job<Box<dyn Any + Send + 'static>>, oneshot::Sender<AnyResult>)>,
}

fn actor_gone() -> DatabaseError {
    DatabaseError::Internal("Database writer is not running".to_string())
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection,
    /// inside an immediate transaction.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| actor_gone())?;

        let boxed = ret_rx.await.map_err(|_| actor_gone())??;
        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            DatabaseError::Internal("Unexpected result type from database writer".to_string())
                .into()
        })
    }
}

/// Spawns a background Tokio task that acts as a single writer to the database.
/// The actor owns one pooled connection and runs jobs serially.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) =
        mpsc::channel::<(Job<Box<dyn Any + Send + 'static>>, oneshot::Sender<AnyResult>)>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                // Dropping `rx` makes every pending and future `exec` fail.
                error!("Database writer could not acquire a connection: {}", e);
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: AnyResult = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(|e: StorageError| e.into());

            // The requester may have gone away.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
