use super::*;
use crate::models::NodeKind;

fn owner() -> OwnerId {
    OwnerId::new("alice")
}

fn project(backend: &MemoryBackend) -> ProjectId {
    backend
        .insert_project(NewProject {
            name: "demo".to_string(),
            owner: owner(),
            now: 1,
        })
        .id
}

fn text(project: ProjectId, parent: Option<NodeId>, name: &str) -> NewNode {
    NewNode {
        project,
        parent,
        name: name.into(),
        body: NodeBody::Text {
            content: String::new(),
        },
        now: 2,
    }
}

fn folder(project: ProjectId, parent: Option<NodeId>, name: &str) -> NewNode {
    NewNode {
        body: NodeBody::Folder,
        ..text(project, parent, name)
    }
}

#[test]
fn unique_index_is_scoped_by_parent_and_kind() {
    let backend = MemoryBackend::new();
    let p = project(&backend);

    backend.insert_node(text(p, None, "a.txt")).unwrap();
    let err = backend.insert_node(text(p, None, "a.txt")).unwrap_err();
    assert_eq!(
        err,
        BackendError::UniqueViolation {
            kind: NodeKind::File,
            name: "a.txt".into()
        }
    );

    let dir = backend.insert_node(folder(p, None, "a.txt")).unwrap();
    backend.insert_node(text(p, Some(dir), "a.txt")).unwrap();
    assert_eq!(backend.nodes_by_parent(p, None).len(), 2);
    assert_eq!(backend.nodes_by_parent(p, Some(dir)).len(), 1);
}

#[test]
fn rename_checks_siblings_but_not_self() {
    let backend = MemoryBackend::new();
    let p = project(&backend);
    let a = backend.insert_node(text(p, None, "a.rs")).unwrap();
    backend.insert_node(text(p, None, "b.rs")).unwrap();

    let same = NodePatch {
        name: Some("a.rs".into()),
        ..NodePatch::default()
    };
    assert!(backend.patch_node(a, same).is_ok());

    let clash = NodePatch {
        name: Some("b.rs".into()),
        ..NodePatch::default()
    };
    assert!(matches!(
        backend.patch_node(a, clash),
        Err(BackendError::UniqueViolation { .. })
    ));
    assert_eq!(backend.node(a).unwrap().name, "a.rs");
}

#[test]
fn content_patch_only_applies_to_text_files() {
    let backend = MemoryBackend::new();
    let p = project(&backend);
    let file = backend.insert_node(text(p, None, "main.rs")).unwrap();
    let dir = backend.insert_node(folder(p, None, "src")).unwrap();

    let patch = NodePatch {
        content: Some("fn main() {}".to_string()),
        updated_at: Some(9),
        ..NodePatch::default()
    };
    backend.patch_node(file, patch.clone()).unwrap();
    let node = backend.node(file).unwrap();
    assert_eq!(node.content(), Some("fn main() {}"));
    assert_eq!(node.updated_at, 9);

    assert_eq!(backend.patch_node(dir, patch), Err(BackendError::Missing));
}

#[test]
fn delete_frees_the_name_and_the_index_slot() {
    let backend = MemoryBackend::new();
    let p = project(&backend);
    let a = backend.insert_node(text(p, None, "a.txt")).unwrap();

    backend.delete_node(a).unwrap();
    assert!(backend.node(a).is_none());
    assert!(backend.nodes_by_parent(p, None).is_empty());
    assert_eq!(backend.delete_node(a), Err(BackendError::Missing));

    let again = backend.insert_node(text(p, None, "a.txt")).unwrap();
    assert_ne!(again, a);
}

#[test]
fn projects_are_indexed_by_owner() {
    let backend = MemoryBackend::new();
    let p = project(&backend);
    backend.insert_project(NewProject {
        name: "other".to_string(),
        owner: OwnerId::new("bob"),
        now: 3,
    });

    let mine = backend.projects_by_owner(&owner());
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, p);

    backend
        .patch_project(
            p,
            ProjectPatch {
                name: Some("renamed".to_string()),
                updated_at: Some(10),
            },
        )
        .unwrap();
    let project = backend.project(p).unwrap();
    assert_eq!(project.name, "renamed");
    assert_eq!(project.created_at, 1);
    assert_eq!(project.updated_at, 10);
}

#[test]
fn blob_release_reports_unknown_refs() {
    let blobs = MemoryBlobStore::new();
    let blob = BlobRef::new("img-1");
    blobs.put(blob.clone());
    assert!(blobs.contains(&blob));

    blobs.release(&blob).unwrap();
    assert!(!blobs.contains(&blob));
    assert!(matches!(blobs.release(&blob), Err(BlobError::NotFound(_))));
}
