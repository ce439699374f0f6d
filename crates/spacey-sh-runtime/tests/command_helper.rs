//! `exec` / `$` as seen from scripts

use spacey_sh_runtime::{ExecOptions, RuntimeOptions, ScriptRuntime};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn runtime_with(exec: ExecOptions) -> ScriptRuntime {
    ScriptRuntime::new(RuntimeOptions {
        exec,
        ..RuntimeOptions::default()
    })
    .unwrap()
}

fn sh() -> ExecOptions {
    ExecOptions {
        shell: "sh".to_string(),
        ..ExecOptions::default()
    }
}

/// Run `code` as a main module and read back `globalThis.result`.
fn script_result(runtime: &mut ScriptRuntime, dir: &Path, code: &str) -> String {
    let script = dir.join("main.js");
    fs::write(&script, code).unwrap();
    runtime.run_file(&script).unwrap();
    runtime.eval_to_string("globalThis.result").unwrap()
}

#[test]
fn test_quiet_result_is_its_stdout() {
    let dir = TempDir::new().unwrap();
    let mut runtime = runtime_with(sh());
    let result = script_result(
        &mut runtime,
        dir.path(),
        r#"const r = $("printf '%s\\n' 4");
globalThis.result = [r == "4\n", r.stdout === "4\n", JSON.stringify(r.toArray()), r.status, typeof r.pid].join("|");
"#,
    );
    assert_eq!(result, r#"true|true|["4"]|0|number"#);
}

#[test]
fn test_arguments_become_one_command_line() {
    let dir = TempDir::new().unwrap();
    let mut runtime = runtime_with(sh());
    let result = script_result(
        &mut runtime,
        dir.path(),
        r#"globalThis.result = String($("printf '%s,'", { a: true }, ["-l", ["x"]], { color: "auto" }));
"#,
    );
    assert_eq!(result, "-a,-l,x,--color=auto,");
}

#[test]
fn test_result_can_be_passed_back_as_text() {
    let dir = TempDir::new().unwrap();
    let mut runtime = runtime_with(sh());
    let result = script_result(
        &mut runtime,
        dir.path(),
        r#"const name = $("printf hello");
globalThis.result = `${$("printf '<%s>'", name)}`;
"#,
    );
    assert_eq!(result, "<hello>");
}

#[test]
fn test_failures_are_reported_as_data() {
    let dir = TempDir::new().unwrap();
    let mut runtime = runtime_with(sh());
    let result = script_result(
        &mut runtime,
        dir.path(),
        r#"const failed = $("exit 3");
const killed = $("kill -TERM $$");
globalThis.result = [failed.status, failed.signal, killed.status, killed.signal].join(",");
"#,
    );
    assert_eq!(result, "3,,,SIGTERM");
}

#[test]
fn test_exec_forwards_output() {
    let dir = TempDir::new().unwrap();
    let mut runtime = runtime_with(sh());
    let result = script_result(
        &mut runtime,
        dir.path(),
        r#"const r = exec("true");
globalThis.result = [r.stdout === null, r.stderr === null, r.status, String(r) === "", r.output[0] === null].join(",");
"#,
    );
    assert_eq!(result, "true,true,0,true,true");
}

#[test]
fn test_capture_stderr() {
    let dir = TempDir::new().unwrap();
    let mut runtime = runtime_with(ExecOptions {
        capture_stderr: true,
        ..sh()
    });
    let result = script_result(
        &mut runtime,
        dir.path(),
        r#"const r = $("echo out; echo err >&2");
globalThis.result = JSON.stringify([r.stdout, r.stderr, r.output[1], r.output[2]]);
"#,
    );
    assert_eq!(result, r#"["out\n","err\n","out\n","err\n"]"#);
}

#[test]
fn test_missing_shell_throws() {
    let dir = TempDir::new().unwrap();
    let mut runtime = runtime_with(ExecOptions {
        shell: "/nonexistent/bin/shell".to_string(),
        ..ExecOptions::default()
    });
    let result = script_result(
        &mut runtime,
        dir.path(),
        "try { $('true'); } catch (e) { globalThis.result = e.code; }\n",
    );
    assert_eq!(result, "ENOENT");
}

#[test]
fn test_output_limit_throws() {
    let dir = TempDir::new().unwrap();
    let mut runtime = runtime_with(ExecOptions {
        max_buffer: 64,
        ..sh()
    });
    let result = script_result(
        &mut runtime,
        dir.path(),
        "try { $('yes'); } catch (e) { globalThis.result = e.code; }\n",
    );
    assert_eq!(result, "ENOBUFS");
}

#[test]
fn test_to_array_with_delimiter() {
    let dir = TempDir::new().unwrap();
    let mut runtime = runtime_with(sh());
    let result = script_result(
        &mut runtime,
        dir.path(),
        r#"const r = $("printf 'a:b:c\n'");
globalThis.result = [r.toArray(":").join("|"), $("true").toArray().length].join(",");
"#,
    );
    assert_eq!(result, "a|b|c,0");
}
