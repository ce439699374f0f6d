//! `cd` and `pwd` change the process-wide working directory, so this test
//! lives in its own binary.

use spacey_sh_runtime::{RuntimeOptions, ScriptRuntime};
use std::env;
use tempfile::TempDir;

#[test]
fn test_cd_and_pwd() {
    let original = env::current_dir().unwrap();
    let dir = TempDir::new().unwrap();
    let target = dir.path().to_string_lossy().into_owned();

    let mut runtime = ScriptRuntime::new(RuntimeOptions::default()).unwrap();
    let seen = runtime.eval_to_string(&format!("cd({target:?}); pwd()"));
    let process_cwd = runtime.eval_to_string("process.cwd()");
    let missing = runtime.eval_to_string(
        "(() => { try { cd('./definitely/missing'); return 'ok'; } catch (e) { return e.code; } })()",
    );
    env::set_current_dir(&original).unwrap();

    let expected = dir.path().canonicalize().unwrap();
    assert_eq!(
        std::path::Path::new(&seen.unwrap()).canonicalize().unwrap(),
        expected
    );
    assert_eq!(
        std::path::Path::new(&process_cwd.unwrap()).canonicalize().unwrap(),
        expected
    );
    assert_eq!(missing.unwrap(), "ENOENT");
}
