#[cfg(test)]
mod tests {
    use std::{fs, io::Read, io::Write, path::PathBuf};

    use crate::shell::{
        executor::{self, InputStream, OutputStream, StagePlan},
        parser::{self, parse},
        pipeline,
        shell_error::ShellErrorKind,
        Env,
    };

    fn sys_env(cwd: PathBuf) -> Env {
        let dirs = vec![PathBuf::from("/usr/bin"), PathBuf::from("/bin")];
        Env::with_parts(dirs, cwd, None)
    }

    fn run_line(env: &Env, line: &str) -> (Result<Option<i32>, ShellErrorKind>, String) {
        let stages = pipeline::build(&parse(line)).unwrap();
        let plans = StagePlan::plan(stages).unwrap();
        let (mut reader, writer) = os_pipe::pipe().unwrap();
        let error = writer.try_clone().unwrap();
        let result = executor::run(
            env,
            plans,
            InputStream::Null,
            OutputStream::Pipe(writer),
            OutputStream::Pipe(error),
        );
        let mut captured = String::new();
        reader.read_to_string(&mut captured).unwrap();
        (result, captured)
    }

    #[test]
    fn echo_writes_its_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let env = sys_env(dir.path().to_path_buf());
        let (result, output) = run_line(&env, "echo hello   'big  world'");
        assert_eq!(result.unwrap(), None);
        assert_eq!(output, "hello big  world\n");
    }

    #[cfg(unix)]
    #[test]
    fn builtin_pipes_into_external() {
        let dir = tempfile::tempdir().unwrap();
        let env = sys_env(dir.path().to_path_buf());
        let (result, output) = run_line(&env, "echo hello | tr a-z A-Z");
        assert_eq!(result.unwrap(), Some(0));
        assert_eq!(output, "HELLO\n");
    }

    #[cfg(unix)]
    #[test]
    fn builtin_last_stage_has_no_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let env = sys_env(dir.path().to_path_buf());
        let (result, output) = run_line(&env, "true | echo done");
        assert_eq!(result.unwrap(), None);
        assert_eq!(output, "done\n");
    }

    #[cfg(unix)]
    #[test]
    fn external_exit_code_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let env = sys_env(dir.path().to_path_buf());
        let (result, _) = run_line(&env, "sh -c 'exit 3'");
        assert_eq!(result.unwrap(), Some(3));
    }

    #[test]
    fn unresolvable_command_reports_on_output() {
        let dir = tempfile::tempdir().unwrap();
        let env = sys_env(dir.path().to_path_buf());
        let (result, output) = run_line(&env, "echo hi | definitely-not-a-command");
        assert_eq!(result.unwrap(), None);
        assert_eq!(output, "definitely-not-a-command: command not found\n");
    }

    #[cfg(unix)]
    #[test]
    fn pipeline_input_reaches_first_stage() {
        let dir = tempfile::tempdir().unwrap();
        let env = sys_env(dir.path().to_path_buf());

        let (mut out_reader, out_writer) = os_pipe::pipe().unwrap();
        let (in_reader, mut in_writer) = os_pipe::pipe().unwrap();
        in_writer.write_all(b"alpha\nbeta\n").unwrap();
        drop(in_writer);

        let plans = StagePlan::plan(pipeline::build(&parse("cat")).unwrap()).unwrap();
        let result = executor::run(
            &env,
            plans,
            InputStream::Pipe(in_reader),
            OutputStream::Pipe(out_writer),
            OutputStream::Null,
        );
        assert_eq!(result.unwrap(), Some(0));

        let mut captured = String::new();
        out_reader.read_to_string(&mut captured).unwrap();
        assert_eq!(captured, "alpha\nbeta\n");
    }

    #[test]
    fn stdout_redirection_truncates_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let env = sys_env(dir.path().to_path_buf());

        run_line(&env, "echo one > out.txt").0.unwrap();
        run_line(&env, "echo two >> out.txt").0.unwrap();
        let path = dir.path().join("out.txt");
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");

        run_line(&env, "echo three > out.txt").0.unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "three\n");
    }

    #[test]
    fn stderr_redirection_captures_builtin_errors() {
        let dir = tempfile::tempdir().unwrap();
        let env = sys_env(dir.path().to_path_buf());

        let (result, output) = run_line(&env, "cd missing-dir 2> err.txt");
        assert_eq!(result.unwrap(), None);
        assert_eq!(output, "");
        assert_eq!(
            fs::read_to_string(dir.path().join("err.txt")).unwrap(),
            "cd: missing-dir: No such file or directory\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn failed_redirect_open_does_not_hang_the_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let env = sys_env(dir.path().to_path_buf());
        let (result, _) = run_line(&env, "echo hi > missing-dir/out.txt | cat");
        assert!(matches!(result, Err(ShellErrorKind::FileNotFound(_))));
    }

    #[test]
    fn cd_and_pwd_track_the_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        let env = sys_env(root.clone());

        run_line(&env, "cd sub").0.unwrap();
        assert_eq!(env.cwd(), root.join("sub"));
        let (_, output) = run_line(&env, "pwd");
        assert_eq!(output.trim_end(), root.join("sub").to_string_lossy());

        run_line(&env, "cd ..").0.unwrap();
        assert_eq!(env.cwd(), root);
    }

    #[test]
    fn cd_tilde_requires_home() {
        let dir = tempfile::tempdir().unwrap();
        let env = sys_env(dir.path().to_path_buf());
        let (result, _) = run_line(&env, "cd ~");
        assert!(matches!(result, Err(ShellErrorKind::HomeNotSet)));

        let home = dir.path().to_path_buf();
        let env = Env::with_parts(Vec::new(), home.clone(), Some(home.clone()));
        run_line(&env, "cd ~").0.unwrap();
        assert_eq!(env.cwd(), home);
    }

    #[test]
    fn type_prefers_builtins_over_path() {
        let dir = tempfile::tempdir().unwrap();
        let env = sys_env(dir.path().to_path_buf());
        let (_, output) = run_line(&env, "type echo");
        assert_eq!(output, "echo is a shell builtin\n");

        let (_, output) = run_line(&env, "type definitely-not-a-command");
        assert_eq!(output, "definitely-not-a-command: not found\n");
    }

    #[test]
    fn history_builtin_lists_numbered_entries() {
        let dir = tempfile::tempdir().unwrap();
        let env = sys_env(dir.path().to_path_buf());
        env.history().add("echo one");
        env.history().add("echo two");
        env.history().add("echo three");

        let (_, output) = run_line(&env, "history");
        assert_eq!(output, "\t1 echo one\n\t2 echo two\n\t3 echo three\n");

        let (_, output) = run_line(&env, "history 2");
        assert_eq!(output, "\t2 echo two\n\t3 echo three\n");
    }

    #[test]
    fn history_builtin_writes_and_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let env = sys_env(dir.path().to_path_buf());
        env.history().add("echo saved");
        run_line(&env, "history -w saved.txt").0.unwrap();

        let other = sys_env(dir.path().to_path_buf());
        run_line(&other, "history -r saved.txt").0.unwrap();
        assert_eq!(other.history().entries(), ["echo saved"]);
    }

    fn random_ascii_string(len: usize) -> String {
        use rand::prelude::*;
        let mut rng = rand::thread_rng();
        let mut s = String::new();
        for _ in 0..len {
            let ch: u8 = rng.gen_range(0..=127);
            s.push(ch as char);
        }
        s
    }

    #[test]
    fn random_ascii_parse_test() {
        for _ in 0..100 {
            let line = random_ascii_string(1000);
            let parsed = parser::parse(&line);
            let _ = pipeline::build(&parsed).map(StagePlan::plan);
        }
    }
}
