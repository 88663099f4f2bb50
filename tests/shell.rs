use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// A shell reading `script` from stdin, with HOME pointed at a scratch
/// directory so no real rc file is sourced.
fn vena(home: &TempDir, script: &str) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("vena");
    cmd.env("HOME", home.path())
        .env_remove("RUST_LOG")
        .current_dir(home.path())
        .arg("--quiet")
        .write_stdin(script.to_string());
    cmd
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

mod parsing {
    use super::*;

    #[test]
    fn quoted_argument_stays_one_word() {
        let home = TempDir::new().unwrap();
        vena(&home, "printf '[%s]\\n' \"a  b\" c\n")
            .assert()
            .success()
            .stdout("[a  b]\n[c]\n");
    }

    #[test]
    fn variables_expand_inside_double_quotes() {
        let home = TempDir::new().unwrap();
        vena(&home, "GREETING=hi\necho \"$GREETING there\" ${GREETING}!\n")
            .assert()
            .success()
            .stdout("hi there hi!\n");
    }

    #[test]
    fn lone_redirect_is_a_syntax_error_and_the_loop_continues() {
        let home = TempDir::new().unwrap();
        vena(&home, ">\necho still-here\n")
            .assert()
            .success()
            .stdout("still-here\n")
            .stderr(predicate::str::contains("vena: syntax error"));
    }

    #[test]
    fn unterminated_quote_is_reported() {
        let home = TempDir::new().unwrap();
        vena(&home, "echo 'open\necho next\n")
            .assert()
            .success()
            .stdout("next\n")
            .stderr(predicate::str::contains("unterminated"));
    }

    #[test]
    fn only_the_first_pipe_splits() {
        let home = TempDir::new().unwrap();
        vena(&home, "echo left | echo right | tail\n")
            .assert()
            .success()
            .stdout("right | tail\n");
    }

    #[test]
    fn quoted_operators_are_arguments() {
        let home = TempDir::new().unwrap();
        vena(&home, "echo '|' \"<\" '&'\n")
            .assert()
            .success()
            .stdout("| < &\n");
    }
}

mod redirection {
    use super::*;

    #[test]
    fn output_then_input_round_trip() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("out.txt");
        let script = format!("echo hello > {0}\ncat < {0}\n", arg(&out));
        vena(&home, &script).assert().success().stdout("hello\n");
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "hello\n");
    }

    #[test]
    fn builtin_output_goes_to_file_only() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("pwd.txt");
        let script = format!("pwd > {}\necho after\n", arg(&out));
        vena(&home, &script).assert().success().stdout("after\n");
        assert!(!std::fs::read_to_string(&out).unwrap().is_empty());
    }

    #[test]
    fn missing_input_file_skips_command() {
        let home = TempDir::new().unwrap();
        vena(&home, "cat < missing.txt\necho ok\n")
            .assert()
            .success()
            .stdout("ok\n")
            .stderr(predicate::str::contains(
                "vena: missing.txt: No such file or directory",
            ));
    }
}

mod pipes {
    use super::*;

    #[test]
    fn output_flows_through_pipe() {
        let home = TempDir::new().unwrap();
        vena(&home, "echo pipeline-test | cat\n")
            .assert()
            .success()
            .stdout("pipeline-test\n");
    }

    #[test]
    fn pipeline_with_redirected_ends() {
        let home = TempDir::new().unwrap();
        let input = home.path().join("words.txt");
        let out = home.path().join("sorted.txt");
        std::fs::write(&input, "pear\napple\n").unwrap();

        let script = format!("sort < {} | cat > {}\n", arg(&input), arg(&out));
        vena(&home, &script).assert().success().stdout("");
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "apple\npear\n");
    }

    #[test]
    fn unknown_command_in_pipeline() {
        let home = TempDir::new().unwrap();
        vena(&home, "echo x | vena-no-such-command-xyz\necho next\n")
            .assert()
            .success()
            .stdout("next\n")
            .stderr(
                predicate::str::contains("vena-no-such-command-xyz: command not found")
                    .and(predicate::str::contains("vena: vena-no-such").not()),
            );
    }
}

mod builtins {
    use super::*;

    #[test]
    fn cd_persists_for_builtins_and_children() {
        let home = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        let dir = target.path().canonicalize().unwrap();
        std::fs::write(dir.join("marker.txt"), "").unwrap();

        let script = format!("cd {}\npwd\nls\n", arg(&dir));
        vena(&home, &script)
            .assert()
            .success()
            .stdout(format!("{}\nmarker.txt\n", dir.display()));
    }

    #[test]
    fn cd_dash_returns_and_echoes() {
        let home = TempDir::new().unwrap();
        let start = home.path().canonicalize().unwrap();
        vena(&home, "cd /\ncd -\n")
            .current_dir(&start)
            .assert()
            .success()
            .stdout(format!("{}\n", start.display()));
    }

    #[test]
    fn cd_failure_is_reported() {
        let home = TempDir::new().unwrap();
        vena(&home, "cd /no/such/dir\n")
            .assert()
            .success()
            .stderr(predicate::str::contains(
                "vena: cd: /no/such/dir: No such file or directory",
            ));
    }

    #[test]
    fn export_reaches_children() {
        let home = TempDir::new().unwrap();
        vena(&home, "export VENA_IT_VAR=exported\nprintenv VENA_IT_VAR\n")
            .assert()
            .success()
            .stdout("exported\n");
    }

    #[test]
    fn local_variable_is_not_exported_until_asked() {
        let home = TempDir::new().unwrap();
        vena(
            &home,
            "VENA_IT_LOCAL=1\nprintenv VENA_IT_LOCAL\nexport VENA_IT_LOCAL\nprintenv VENA_IT_LOCAL\n",
        )
        .assert()
        .success()
        .stdout("1\n");
    }

    #[test]
    fn history_lists_lines() {
        let home = TempDir::new().unwrap();
        vena(&home, "echo one\nhistory\n")
            .assert()
            .success()
            .stdout("one\n    1  echo one\n    2  history\n");
    }

    #[test]
    fn type_reports_builtins_and_paths() {
        let home = TempDir::new().unwrap();
        vena(&home, "type cd sh\n")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("cd is a shell builtin\nsh is /"));
    }
}

mod exit_status {
    use super::*;

    #[test]
    fn exit_with_status() {
        let home = TempDir::new().unwrap();
        vena(&home, "exit 3\necho unreachable\n")
            .assert()
            .code(3)
            .stdout("");
    }

    #[test]
    fn exit_with_non_numeric_argument() {
        let home = TempDir::new().unwrap();
        vena(&home, "exit abc\n")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("exit: abc: numeric argument required"));
    }

    #[test]
    fn end_of_input_exits_zero() {
        let home = TempDir::new().unwrap();
        vena(&home, "sh -c 'exit 5'\n").assert().code(0);
    }

    #[test]
    fn unknown_option_fails() {
        cargo_bin_cmd!("vena")
            .arg("--bogus")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("unknown option: --bogus"));
    }

    #[test]
    fn version_flag() {
        cargo_bin_cmd!("vena")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("vena "));
    }
}

mod rc_file {
    use super::*;

    #[test]
    fn default_rc_file_is_sourced() {
        let home = TempDir::new().unwrap();
        std::fs::write(
            home.path().join(".venarc"),
            "# startup\nexport VENA_RC_VAR=from-rc\n\n",
        )
        .unwrap();
        vena(&home, "echo $VENA_RC_VAR\n")
            .assert()
            .success()
            .stdout("from-rc\n");
    }

    #[test]
    fn explicit_rc_file_must_exist() {
        let home = TempDir::new().unwrap();
        vena(&home, "echo hi\n")
            .args(["--config", "/no/such/venarc"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("/no/such/venarc"));
    }
}

mod background {
    use super::*;

    #[test]
    fn background_job_does_not_block_the_loop() {
        let home = TempDir::new().unwrap();
        let started = Instant::now();
        let status = Command::new(env!("CARGO_BIN_EXE_vena"))
            .env("HOME", home.path())
            .arg("--quiet")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .and_then(|mut child| {
                use std::io::Write;
                child
                    .stdin
                    .take()
                    .unwrap()
                    .write_all(b"sleep 5 > /dev/null &\nexit 0\n")?;
                child.wait()
            })
            .unwrap();
        assert!(status.success());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn finished_job_is_reported_before_next_prompt() {
        let home = TempDir::new().unwrap();
        cargo_bin_cmd!("vena")
            .env("HOME", home.path())
            .write_stdin("true &\nsleep 0.5\necho x\n")
            .assert()
            .success()
            .stdout("x\n")
            .stderr(predicate::str::contains("] Done"));
    }
}
