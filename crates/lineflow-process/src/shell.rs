//! `Shell`: the external descriptor that provides the program and argv
//! prefix used to launch a child process. `commandText` stays an opaque
//! string all the way through — the core never splits or interprets it.

/// `program` plus the argv prefix (`options`) a [`crate::ProcessHandle`]
/// prepends to the command text before launch.
#[derive(Debug, Clone)]
pub struct Shell {
    pub program: String,
    pub options: Vec<String>,
}

impl Shell {
    pub fn new(program: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            program: program.into(),
            options,
        }
    }

    /// `bash -c <commandText>`.
    pub fn bash() -> Self {
        Self::new("bash", vec!["-c".to_string()])
    }

    /// `sh -c <commandText>`.
    pub fn sh() -> Self {
        Self::new("sh", vec!["-c".to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_prepends_dash_c() {
        let shell = Shell::bash();
        assert_eq!(shell.program, "bash");
        assert_eq!(shell.options, vec!["-c"]);
    }

    #[test]
    fn sh_prepends_dash_c() {
        let shell = Shell::sh();
        assert_eq!(shell.program, "sh");
        assert_eq!(shell.options, vec!["-c"]);
    }

    #[test]
    fn new_takes_an_arbitrary_program_and_options() {
        let shell = Shell::new("zsh", vec!["-lc".to_string()]);
        assert_eq!(shell.program, "zsh");
        assert_eq!(shell.options, vec!["-lc"]);
    }
}
