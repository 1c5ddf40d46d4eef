use std::process::Command;

struct Check {
    name: &'static str,
    about: &'static str,
}

fn main() {
    let preamble = "Documentation about the checks contained herein\n\n\
All of them are Linux-only, they read /proc (and /sys/fs/cgroup) of the process being checked.\n";

    let checks = [
        Check {
            name: "check-proc-fds",
            about: "Open file descriptors as a percentage of the soft limit.",
        },
        Check {
            name: "check-proc-threads",
            about: "Thread count.",
        },
        Check {
            name: "check-proc-cpu",
            about: "Cpu usage sampled over one second.",
        },
        Check {
            name: "check-proc-tasks",
            about: "Tasks in the process's cgroup as a percentage of its limit.",
        },
    ];

    let mut out: String = cp(preamble.split('\n'));
    out.push_str("\n");
    out.push_str(&cp(checks
        .iter()
        .map(|c| format!("- [{0}](#{0})", c.name))));
    out.push_str("\n");
    for check in &checks {
        out.push_str(&format!(
            "\
//!
//! # {0}
//!
//! {1}
//!
//! ```plain
//! $ {0} --help
",
            check.name, check.about
        ));
        let output = Command::new(&format!("target/debug/{}", check.name))
            .args(&["--help"])
            .output()
            .unwrap_or_else(|e| panic!("Couldn't execute command {}: {}", check.name, e));
        let cout = String::from_utf8(output.stdout)
            .unwrap_or_else(|_| panic!("Couldn't convert command {} help to utf8", check.name));
        out.push_str(&cp(cout.split('\n')));
        out.push_str("\n//! ```\n");
    }
    out.push_str("\n");
    print!("{}", out);
}

/// Comment each line in the iterator
fn cp<S: AsRef<str>, I: Iterator<Item = S>>(s: I) -> String {
    s.map(|s| format!("//! {}", s.as_ref()))
        .map(|s| s.trim().into())
        .collect::<Vec<String>>()
        .join("\n")
}
