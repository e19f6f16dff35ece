use super::*;
use crate::kernel::services::adapters::{MemoryBackend, MemoryBlobStore};
use std::sync::atomic::{AtomicU64, Ordering};

/// Ticks by one on every read.
#[derive(Default)]
struct StepClock(AtomicU64);

impl Clock for StepClock {
    fn now_ms(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

struct Fixture {
    store: WorkspaceStore,
    backend: Arc<MemoryBackend>,
    blobs: Arc<MemoryBlobStore>,
    alice: OwnerId,
    project: ProjectId,
}

fn fixture() -> Fixture {
    let backend = Arc::new(MemoryBackend::new());
    let blobs = Arc::new(MemoryBlobStore::new());
    let store = WorkspaceStore::new(
        backend.clone(),
        blobs.clone(),
        Arc::new(StepClock::default()),
    );
    let alice = OwnerId::new("alice");
    let project = store.create_project(&alice, "demo").id;
    Fixture {
        store,
        backend,
        blobs,
        alice,
        project,
    }
}

fn mallory() -> OwnerId {
    OwnerId::new("mallory")
}

#[test]
fn duplicate_file_conflicts_but_folder_of_same_name_is_fine() {
    let fx = fixture();
    fx.store
        .create_file(&fx.alice, fx.project, None, "a.txt", "")
        .unwrap();

    let err = fx
        .store
        .create_file(&fx.alice, fx.project, None, "a.txt", "x")
        .unwrap_err();
    assert_eq!(
        err,
        WorkspaceError::Conflict {
            kind: NodeKind::File,
            name: "a.txt".into(),
            op: ConflictOp::Create,
        }
    );
    assert_eq!(err.to_string(), "File already exists");

    fx.store
        .create_folder(&fx.alice, fx.project, None, "a.txt")
        .unwrap();
    let err = fx
        .store
        .create_folder(&fx.alice, fx.project, None, "a.txt")
        .unwrap_err();
    assert_eq!(err.to_string(), "Folder already exists");
}

#[test]
fn same_name_in_different_folders_is_allowed() {
    let fx = fixture();
    let a = fx.store.create_folder(&fx.alice, fx.project, None, "a").unwrap();
    let b = fx.store.create_folder(&fx.alice, fx.project, None, "b").unwrap();
    fx.store
        .create_file(&fx.alice, fx.project, Some(a), "mod.rs", "")
        .unwrap();
    fx.store
        .create_file(&fx.alice, fx.project, Some(b), "mod.rs", "")
        .unwrap();
}

#[test]
fn parent_must_be_a_folder_in_the_same_project() {
    let fx = fixture();
    let file = fx
        .store
        .create_file(&fx.alice, fx.project, None, "a.txt", "")
        .unwrap();
    let err = fx
        .store
        .create_file(&fx.alice, fx.project, Some(file), "b.txt", "")
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::InvalidOperation(_)));

    let other = fx.store.create_project(&fx.alice, "other").id;
    let foreign = fx.store.create_folder(&fx.alice, other, None, "dir").unwrap();
    let err = fx
        .store
        .create_folder(&fx.alice, fx.project, Some(foreign), "x")
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::InvalidOperation(_)));

    fx.backend.delete_node(foreign).unwrap();
    let err = fx
        .store
        .create_folder(&fx.alice, fx.project, Some(foreign), "x")
        .unwrap_err();
    assert_eq!(err, WorkspaceError::NotFound("Parent folder"));
}

#[test]
fn rename_to_own_name_succeeds_and_clash_is_rejected() {
    let fx = fixture();
    let a = fx
        .store
        .create_file(&fx.alice, fx.project, None, "a.txt", "")
        .unwrap();
    fx.store
        .create_file(&fx.alice, fx.project, None, "b.txt", "")
        .unwrap();

    fx.store.rename(&fx.alice, a, "a.txt").unwrap();
    let err = fx.store.rename(&fx.alice, a, "b.txt").unwrap_err();
    assert!(matches!(
        err,
        WorkspaceError::Conflict {
            op: ConflictOp::Rename,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "A file with this name already exists in this project"
    );

    fx.store.rename(&fx.alice, a, "c.txt").unwrap();
    assert_eq!(fx.store.get_file(&fx.alice, a).unwrap().name, "c.txt");
}

#[test]
fn deleting_a_folder_removes_the_subtree() {
    let fx = fixture();
    let src = fx.store.create_folder(&fx.alice, fx.project, None, "src").unwrap();
    let util = fx
        .store
        .create_folder(&fx.alice, fx.project, Some(src), "util")
        .unwrap();
    fx.store
        .create_file(&fx.alice, fx.project, Some(util), "a.rs", "")
        .unwrap();
    let blob = BlobRef::new("b1");
    fx.blobs.put(blob.clone());
    fx.store
        .create_binary_file(&fx.alice, fx.project, Some(src), "icon.png", blob.clone())
        .unwrap();
    fx.store
        .create_file(&fx.alice, fx.project, None, "main.rs", "")
        .unwrap();

    assert_eq!(fx.store.delete_node(&fx.alice, src).unwrap(), 4);
    let left = fx.store.list_by_project(&fx.alice, fx.project).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].name, "main.rs");
    assert!(!fx.blobs.contains(&blob));

    assert_eq!(
        fx.store.delete_node(&fx.alice, src),
        Err(WorkspaceError::NotFound("Item"))
    );
}

#[test]
fn resolve_path_ends_at_the_node() {
    let fx = fixture();
    let a = fx.store.create_folder(&fx.alice, fx.project, None, "a").unwrap();
    let b = fx.store.create_folder(&fx.alice, fx.project, Some(a), "b").unwrap();
    let c = fx
        .store
        .create_file(&fx.alice, fx.project, Some(b), "c.txt", "")
        .unwrap();

    let path = fx.store.resolve_path(&fx.alice, c).unwrap();
    let ids: Vec<_> = path.iter().map(|seg| seg.id).collect();
    assert_eq!(ids, vec![a, b, c]);
    assert_eq!(path.last().map(|seg| seg.name.as_str()), Some("c.txt"));

    fx.store.delete_node(&fx.alice, c).unwrap();
    assert!(fx.store.resolve_path(&fx.alice, c).unwrap().is_empty());
}

#[test]
fn other_owners_are_unauthorized() {
    let fx = fixture();
    let file = fx
        .store
        .create_file(&fx.alice, fx.project, None, "a.txt", "")
        .unwrap();
    let intruder = mallory();

    assert_eq!(
        fx.store.get_project(&intruder, fx.project),
        Err(WorkspaceError::Unauthorized)
    );
    assert_eq!(
        fx.store.get_file(&intruder, file),
        Err(WorkspaceError::Unauthorized)
    );
    assert_eq!(
        fx.store.create_file(&intruder, fx.project, None, "x", ""),
        Err(WorkspaceError::Unauthorized)
    );
    assert_eq!(
        fx.store.delete_node(&intruder, file),
        Err(WorkspaceError::Unauthorized)
    );
    assert_eq!(
        fx.store.resolve_path(&intruder, file),
        Err(WorkspaceError::Unauthorized)
    );
    assert!(fx.store.get_file(&fx.alice, file).is_ok());
    assert!(fx.store.list_projects(&intruder).is_empty());
}

#[test]
fn authorization_is_checked_before_content_kind() {
    let fx = fixture();
    let dir = fx.store.create_folder(&fx.alice, fx.project, None, "d").unwrap();
    assert_eq!(
        fx.store.update_content(&mallory(), dir, "x"),
        Err(WorkspaceError::Unauthorized)
    );
    assert_eq!(
        fx.store.update_content(&fx.alice, dir, "x"),
        Err(WorkspaceError::InvalidOperation(
            "Can only update content of text files"
        ))
    );
}

#[test]
fn update_content_rejects_binary_files() {
    let fx = fixture();
    let bin = fx
        .store
        .create_binary_file(&fx.alice, fx.project, None, "a.bin", BlobRef::new("z"))
        .unwrap();
    assert!(matches!(
        fx.store.update_content(&fx.alice, bin, "text"),
        Err(WorkspaceError::InvalidOperation(_))
    ));
}

#[test]
fn mutations_refresh_project_timestamp() {
    let fx = fixture();
    let before = fx.store.get_project(&fx.alice, fx.project).unwrap();
    assert_eq!(before.created_at, before.updated_at);

    let file = fx
        .store
        .create_file(&fx.alice, fx.project, None, "a.txt", "")
        .unwrap();
    let after_create = fx.store.get_project(&fx.alice, fx.project).unwrap();
    assert!(after_create.updated_at > before.updated_at);

    fx.store.update_content(&fx.alice, file, "hello").unwrap();
    let after_update = fx.store.get_project(&fx.alice, fx.project).unwrap();
    assert!(after_update.updated_at > after_create.updated_at);
    assert_eq!(after_update.created_at, before.created_at);

    let node = fx.store.get_file(&fx.alice, file).unwrap();
    assert_eq!(node.content(), Some("hello"));
    assert_eq!(node.updated_at, after_update.updated_at);
}

#[test]
fn projects_list_newest_first_and_partial_truncates() {
    let fx = fixture();
    let second = fx.store.create_project(&fx.alice, "second").id;
    let third = fx.store.create_project(&fx.alice, "third").id;
    fx.store.create_project(&mallory(), "not mine");

    let ids: Vec<_> = fx
        .store
        .list_projects(&fx.alice)
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![third, second, fx.project]);

    let partial = fx.store.list_projects_partial(&fx.alice, 2);
    assert_eq!(partial.len(), 2);
    assert_eq!(partial[0].id, third);
}

#[test]
fn rename_project_returns_updated_project() {
    let fx = fixture();
    let renamed = fx
        .store
        .rename_project(&fx.alice, fx.project, "renamed")
        .unwrap();
    assert_eq!(renamed.name, "renamed");
    assert!(renamed.updated_at > renamed.created_at);
    assert_eq!(
        fx.store.rename_project(&mallory(), fx.project, "x"),
        Err(WorkspaceError::Unauthorized)
    );
}

#[test]
fn children_are_listed_in_tree_order() {
    let fx = fixture();
    let src = fx.store.create_folder(&fx.alice, fx.project, None, "src").unwrap();
    fx.store
        .create_file(&fx.alice, fx.project, None, "Cargo.toml", "")
        .unwrap();
    fx.store
        .create_folder(&fx.alice, fx.project, None, "benches")
        .unwrap();
    fx.store
        .create_file(&fx.alice, fx.project, Some(src), "lib.rs", "")
        .unwrap();

    let root: Vec<_> = fx
        .store
        .list_children(&fx.alice, fx.project, None)
        .unwrap()
        .into_iter()
        .map(|n| n.name.to_string())
        .collect();
    assert_eq!(root, vec!["benches", "src", "Cargo.toml"]);

    let nested = fx
        .store
        .list_children(&fx.alice, fx.project, Some(src))
        .unwrap();
    assert_eq!(nested.len(), 1);
}

#[test]
fn sweep_removes_subtrees_of_vanished_parents() {
    let fx = fixture();
    let dir = fx.store.create_folder(&fx.alice, fx.project, None, "dir").unwrap();
    let inner = fx
        .store
        .create_folder(&fx.alice, fx.project, Some(dir), "inner")
        .unwrap();
    fx.store
        .create_file(&fx.alice, fx.project, Some(inner), "x.rs", "")
        .unwrap();
    fx.store
        .create_file(&fx.alice, fx.project, None, "keep.rs", "")
        .unwrap();

    // Simulate an interrupted cascade: the folder went, its children did not.
    fx.backend.delete_node(dir).unwrap();

    assert_eq!(fx.store.sweep_orphans(&fx.alice, fx.project).unwrap(), 2);
    let left = fx.store.list_by_project(&fx.alice, fx.project).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(fx.store.sweep_orphans(&fx.alice, fx.project).unwrap(), 0);
}

#[test]
fn missing_project_is_not_found() {
    let fx = fixture();
    let ghost = ProjectId::default();
    assert_eq!(
        fx.store.get_project(&fx.alice, ghost),
        Err(WorkspaceError::NotFound("Project"))
    );
    assert_eq!(
        fx.store.list_children(&fx.alice, ghost, None),
        Err(WorkspaceError::NotFound("Project"))
    );
}
