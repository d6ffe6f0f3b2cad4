//! Two machines syncing a config directory through a bare remote.

use std::fs;

use mcpenv_git::{ConfigRepo, Error};
use tempfile::TempDir;

fn bare_remote(temp: &TempDir) -> String {
    let path = temp.path().join("remote.git");
    git2::Repository::init_bare(&path).unwrap();
    path.to_string_lossy().into_owned()
}

/// Point the bare remote's HEAD at the branch the first push created, so a
/// later clone checks out the right branch.
fn point_head(temp: &TempDir, branch: &str) {
    let bare = git2::Repository::open_bare(temp.path().join("remote.git")).unwrap();
    bare.set_head(&format!("refs/heads/{branch}")).unwrap();
}

#[test]
fn push_then_clone_round_trips_config() {
    let temp = TempDir::new().unwrap();
    let remote = bare_remote(&temp);

    let a_dir = temp.path().join("machine-a");
    fs::create_dir(&a_dir).unwrap();
    let a = ConfigRepo::new(&a_dir);
    a.init().unwrap();
    fs::write(a_dir.join("config.yaml"), "mcp_servers: {}\n").unwrap();
    a.commit_all("initial config").unwrap();
    a.add_remote(&remote).unwrap();
    a.push().unwrap();
    point_head(&temp, &a.current_branch().unwrap());

    let b_dir = temp.path().join("machine-b");
    let b = ConfigRepo::new(&b_dir);
    b.clone_from(&remote).unwrap();
    assert!(b.is_repo());
    assert!(b_dir.join("config.yaml").exists());
}

#[test]
fn pull_fast_forwards_onto_remote_changes() {
    let temp = TempDir::new().unwrap();
    let remote = bare_remote(&temp);

    let a_dir = temp.path().join("machine-a");
    fs::create_dir(&a_dir).unwrap();
    let a = ConfigRepo::new(&a_dir);
    a.init().unwrap();
    fs::write(a_dir.join("config.yaml"), "v1\n").unwrap();
    a.commit_all("v1").unwrap();
    a.add_remote(&remote).unwrap();
    a.push().unwrap();
    point_head(&temp, &a.current_branch().unwrap());

    let b_dir = temp.path().join("machine-b");
    let b = ConfigRepo::new(&b_dir);
    b.clone_from(&remote).unwrap();

    fs::write(a_dir.join("config.yaml"), "v2\n").unwrap();
    a.commit_all("v2").unwrap();
    a.push().unwrap();

    b.pull().unwrap();
    assert_eq!(fs::read_to_string(b_dir.join("config.yaml")).unwrap(), "v2\n");

    // A second pull with nothing new is a no-op.
    b.pull().unwrap();
}

#[test]
fn diverged_histories_refuse_to_pull() {
    let temp = TempDir::new().unwrap();
    let remote = bare_remote(&temp);

    let a_dir = temp.path().join("machine-a");
    fs::create_dir(&a_dir).unwrap();
    let a = ConfigRepo::new(&a_dir);
    a.init().unwrap();
    fs::write(a_dir.join("config.yaml"), "base\n").unwrap();
    a.commit_all("base").unwrap();
    a.add_remote(&remote).unwrap();
    a.push().unwrap();
    point_head(&temp, &a.current_branch().unwrap());

    let b_dir = temp.path().join("machine-b");
    let b = ConfigRepo::new(&b_dir);
    b.clone_from(&remote).unwrap();

    // Both sides commit independently.
    fs::write(a_dir.join("config.yaml"), "a-change\n").unwrap();
    a.commit_all("from a").unwrap();
    a.push().unwrap();

    fs::write(b_dir.join("config.yaml"), "b-change\n").unwrap();
    b.commit_all("from b").unwrap();

    let err = b.pull().unwrap_err();
    assert!(matches!(err, Error::PullFailed { .. }));
    // The local commit is untouched.
    assert_eq!(
        fs::read_to_string(b_dir.join("config.yaml")).unwrap(),
        "b-change\n"
    );
}
