use crate::error::ShellError;

#[derive(Debug, Clone)]
pub struct Flags {
    flags: Vec<Flag>,
}

#[derive(Debug, Clone)]
pub struct Flag {
    pub name: &'static str,
    pub short: &'static str,
    pub long: &'static str,
    pub description: &'static str,
    pub takes_value: bool,
    pub value: Option<String>,
}

impl Flag {
    const fn new(
        name: &'static str,
        short: &'static str,
        long: &'static str,
        description: &'static str,
        takes_value: bool,
    ) -> Self {
        Flag {
            name,
            short,
            long,
            description,
            takes_value,
            value: None,
        }
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}

impl Flags {
    pub fn new() -> Self {
        let flags = vec![
            Flag::new("help", "-h", "--help", "Print this help message", false),
            Flag::new("version", "-v", "--version", "Show version information", false),
            Flag::new(
                "config",
                "-c",
                "--config",
                "Source this rc file instead of ~/.venarc",
                true,
            ),
            Flag::new("quiet", "-q", "--quiet", "Suppress job and exit notices", false),
            Flag::new("debug", "-d", "--debug", "Enable debug tracing on stderr", false),
        ];

        Flags { flags }
    }

    pub fn parse(&mut self, args: &[String]) -> Result<(), ShellError> {
        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            let flag = self
                .flags
                .iter_mut()
                .find(|flag| arg == flag.short || arg == flag.long)
                .ok_or_else(|| ShellError::FlagError(format!("unknown option: {}", arg)))?;

            if flag.takes_value {
                let value = args.get(i + 1).ok_or_else(|| {
                    ShellError::FlagError(format!("option {} requires a value", arg))
                })?;
                flag.value = Some(value.clone());
                i += 1;
            } else {
                flag.value = Some("true".to_string());
            }
            i += 1;
        }
        Ok(())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get_value(name).is_some()
    }

    pub fn get_value(&self, name: &str) -> Option<&String> {
        self.flags
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_ref())
    }

    pub fn print_help(&self) {
        println!("Usage: vena [OPTIONS]");
        println!("\nOptions:");
        for flag in &self.flags {
            let long = if flag.takes_value {
                format!("{} <file>", flag.long)
            } else {
                flag.long.to_string()
            };
            println!("  {}, {:<17} {}", flag.short, long, flag.description);
        }
    }
}
