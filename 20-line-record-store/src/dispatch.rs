//! Runs parsed commands against the store and turns every outcome,
//! including failures, into a reply body.

use tracing::warn;

use crate::{
    command::Command,
    error::{Result, StoreError},
    reply::Reply,
    service::StoreService,
    store::Storage,
};

const SUCCESS: &str = "success";
const OPERATION_FAILED: &str = "operation failed";

/// Executes `command`. Reads take a shared hold; add, change and delete
/// take an exclusive one.
pub async fn execute<S: Storage>(service: &StoreService<S>, command: Command) -> Reply {
    let outcome = match command {
        Command::Read { index } => read(service, index).await,
        Command::Add { index, body } => add(service, index, &body)
            .await
            .map(|()| format!("You write: {body}")),
        Command::Change { index, body } => {
            let mut store = service.coordinator().exclusive().await;
            store.change_at(index, &body).await.map(|()| SUCCESS.to_string())
        }
        Command::Delete { index } => delete(service, index)
            .await
            .map(|()| SUCCESS.to_string()),
        Command::Exit => return Reply::closing(),
        Command::Unknown(text) => return Reply::text(format!("You enter {text}")),
    };

    match outcome {
        Ok(body) => Reply::text(body),
        Err(err) => reject(err),
    }
}

/// Reply for a command that failed to parse or to run.
pub fn reject(err: StoreError) -> Reply {
    match err {
        StoreError::Io { .. } => {
            warn!(error = %err, "store operation failed");
            Reply::text(OPERATION_FAILED)
        }
        other => Reply::text(other.to_string()),
    }
}

async fn read<S: Storage>(service: &StoreService<S>, index: Option<usize>) -> Result<String> {
    let store = service.coordinator().shared().await;
    match index {
        Some(index) => store.read_line(index).await,
        None => store.read_all().await,
    }
}

async fn add<S: Storage>(service: &StoreService<S>, index: Option<usize>, body: &str) -> Result<()> {
    let mut store = service.coordinator().exclusive().await;
    match index {
        Some(index) => store.add_at(index, body).await,
        None => store.add_append(body).await,
    }
}

async fn delete<S: Storage>(service: &StoreService<S>, index: Option<usize>) -> Result<()> {
    let mut store = service.coordinator().exclusive().await;
    match index {
        Some(index) => store.delete_at(index).await,
        None => store.delete_all().await,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::store::{MemoryStorage, RecordStore};

    fn service(content: &str) -> StoreService<MemoryStorage> {
        StoreService::new(
            RecordStore::new(MemoryStorage::with_content(content)),
            Duration::ZERO,
        )
    }

    async fn respond(service: &StoreService<MemoryStorage>, line: &str) -> String {
        let reply = match Command::parse(line) {
            Ok(command) => execute(service, command).await,
            Err(err) => reject(err),
        };
        reply.body().to_string()
    }

    #[tokio::test]
    async fn reads_whole_store_or_single_line() {
        let service = service("a\nb\nc");
        assert_eq!(respond(&service, "read").await, "a\nb\nc");
        assert_eq!(respond(&service, "read 2").await, "b");
        assert_eq!(respond(&service, "read 0").await, "invalid index");
        assert_eq!(respond(&service, "read 4").await, "invalid index");
        assert_eq!(respond(&service, "read two").await, "invalid index");
    }

    #[tokio::test]
    async fn empty_store_replies() {
        let service = service("");
        assert_eq!(respond(&service, "read").await, "file is empty");
        assert_eq!(respond(&service, "read 1").await, "file is empty");
        assert_eq!(respond(&service, "delete").await, "file is empty");
        assert_eq!(respond(&service, "change 1 x").await, "file is empty");
        assert_eq!(respond(&service, "add -id 3 x").await, "invalid index");
    }

    #[tokio::test]
    async fn mutations_reply_and_apply() {
        let service = service("");
        assert_eq!(respond(&service, "add first record").await, "You write: first record");
        assert_eq!(respond(&service, "add third").await, "You write: third");
        assert_eq!(respond(&service, "add -id 2 second").await, "You write: second");
        assert_eq!(respond(&service, "read").await, "first record\nsecond\nthird");

        assert_eq!(respond(&service, "change 3 last").await, "success");
        assert_eq!(respond(&service, "delete 1").await, "success");
        assert_eq!(respond(&service, "read").await, "second\nlast");

        assert_eq!(respond(&service, "delete").await, "success");
        assert_eq!(respond(&service, "read").await, "file is empty");
    }

    #[tokio::test]
    async fn failed_add_reports_invalid_index_without_writing() {
        let service = service("a");
        assert_eq!(respond(&service, "add -id 5 x").await, "invalid index");
        assert_eq!(respond(&service, "read").await, "a");
    }

    #[tokio::test]
    async fn malformed_and_unknown_lines_keep_session_open() {
        let service = service("a");
        let reply = match Command::parse("change") {
            Ok(command) => execute(&service, command).await,
            Err(err) => reject(err),
        };
        assert!(reply.body().starts_with("malformed command:"));
        assert!(!reply.closes_session());

        assert_eq!(respond(&service, "hello").await, "You enter hello");
    }

    #[tokio::test]
    async fn exit_closes_session() {
        let service = service("");
        let reply = execute(&service, Command::Exit).await;
        assert!(reply.closes_session());
        assert_eq!(reply.body(), "bye!");
    }

    #[tokio::test]
    async fn io_failure_gets_generic_reply() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("records.txt");
        let storage = crate::store::FileStorage::create(&path).await.expect("create");
        std::fs::remove_file(&path).expect("remove store file");

        let service = StoreService::new(RecordStore::new(storage), Duration::ZERO);
        let reply = execute(&service, Command::Read { index: None }).await;
        assert_eq!(reply.body(), "operation failed");
    }
}
