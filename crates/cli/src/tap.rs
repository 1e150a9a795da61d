//! Minimal TAP version 14 producer for the conformance runner.

#[derive(Default)]
pub struct Tap {
    results: Vec<(bool, String, Option<String>)>,
}

impl Tap {
    pub fn new() -> Self {
        Tap {
            results: Vec::new(),
        }
    }

    pub fn ok(&mut self, name: impl Into<String>) {
        self.results.push((true, name.into(), None));
    }

    pub fn not_ok(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.results.push((false, name.into(), Some(message.into())));
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|(passed, _, _)| !passed).count()
    }

    /// Render the collected results, plan line first.
    pub fn render(&self) -> String {
        let mut out = String::from("TAP version 14\n");
        out.push_str(&format!("1..{}\n", self.results.len()));
        for (i, (passed, name, message)) in self.results.iter().enumerate() {
            let n = i + 1;
            if *passed {
                out.push_str(&format!("ok {} - {}\n", n, name));
            } else {
                out.push_str(&format!("not ok {} - {}\n", n, name));
                if let Some(msg) = message {
                    out.push_str("  ---\n");
                    out.push_str("  message: |\n");
                    for line in msg.lines() {
                        out.push_str(&format!("    {}\n", line));
                    }
                    out.push_str("  ...\n");
                }
            }
        }
        out
    }

    /// Print the report to stdout.
    pub fn finish(self) {
        print!("{}", self.render());
    }
}
