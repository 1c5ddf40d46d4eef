//! Documentation about the checks contained herein
//!
//! All of them are Linux-only, they read /proc (and /sys/fs/cgroup) of the process being checked.
//!
//! - [check-proc-fds](#check-proc-fds)
//! - [check-proc-threads](#check-proc-threads)
//! - [check-proc-cpu](#check-proc-cpu)
//! - [check-proc-tasks](#check-proc-tasks)
//!
//! # check-proc-fds
//!
//! Open file descriptors as a percentage of the soft limit.
//!
//! ```plain
//! $ check-proc-fds --help
//! check-proc-fds (part of proc-checks) 0.1.0
//! Check open file descriptors of a process against its limit
//!
//! Counts the entries in /proc/<pid>/fd and compares them to the soft "Max open files" limit in /proc/<pid>/limits.
//! Thresholds are Nagios ranges over the percentage of the limit that is in use. A process with an unlimited limit is
//! always at 0%.
//!
//! USAGE:
//!     check-proc-fds [FLAGS] [OPTIONS] --pid-cmd <pid-cmd>
//!
//! FLAGS:
//!     -D, --debug
//!             Log to stderr, and exit with the error instead of an UNKNOWN status
//!
//!     -h, --help
//!             Prints help information
//!
//!     -V, --version
//!             Prints version information
//!
//!
//! OPTIONS:
//!     -C, --critical <critical>
//!             Percent of the open files limit to go critical at, as a Nagios range [default: 85]
//!
//!     -P, --pid-cmd <pid-cmd>
//!             A shell command that prints the PID of the process to check, e.g. "systemctl show nginx
//!             --property=MainPID --value"
//!         --pid-timeout <SECONDS>
//!             Kill the pid command if it runs longer than this [default: 10]
//!
//!     -W, --warning <warning>
//!             Percent of the open files limit to warn at, as a Nagios range [default: 75]
//! ```
//!
//! # check-proc-threads
//!
//! Thread count.
//!
//! ```plain
//! $ check-proc-threads --help
//! check-proc-threads (part of proc-checks) 0.1.0
//! Check the number of threads a process is running
//!
//! Reads the thread count from /proc/<pid>/stat. Thresholds are Nagios ranges over the thread count, so `-W 100 -C 200`
//! warns above 100 threads.
//!
//! USAGE:
//!     check-proc-threads [FLAGS] [OPTIONS] --critical <critical> --pid-cmd <pid-cmd> --warning <warning>
//!
//! FLAGS:
//!     -D, --debug
//!             Log to stderr, and exit with the error instead of an UNKNOWN status
//!
//!     -h, --help
//!             Prints help information
//!
//!     -V, --version
//!             Prints version information
//!
//!
//! OPTIONS:
//!     -C, --critical <critical>
//!             Thread count to go critical at, as a Nagios range
//!
//!     -P, --pid-cmd <pid-cmd>
//!             A shell command that prints the PID of the process to check, e.g. "systemctl show nginx
//!             --property=MainPID --value"
//!         --pid-timeout <SECONDS>
//!             Kill the pid command if it runs longer than this [default: 10]
//!
//!     -W, --warning <warning>
//!             Thread count to warn at, as a Nagios range
//! ```
//!
//! # check-proc-cpu
//!
//! Cpu usage sampled over one second.
//!
//! ```plain
//! $ check-proc-cpu --help
//! check-proc-cpu (part of proc-checks) 0.1.0
//! Check the cpu usage of a process
//!
//! Samples the user and system time of the process in /proc/<pid>/stat one second apart. Usage is a percentage of a
//! single cpu, so a process keeping four cores busy is at 400%. Thresholds are Nagios ranges over that percentage.
//!
//! Always takes at least a second to run.
//!
//! USAGE:
//!     check-proc-cpu [FLAGS] [OPTIONS] --critical <critical> --pid-cmd <pid-cmd> --warning <warning>
//!
//! FLAGS:
//!     -D, --debug
//!             Log to stderr, and exit with the error instead of an UNKNOWN status
//!
//!     -h, --help
//!             Prints help information
//!
//!     -V, --version
//!             Prints version information
//!
//!
//! OPTIONS:
//!     -C, --critical <critical>
//!             Cpu percentage to go critical at, as a Nagios range
//!
//!     -P, --pid-cmd <pid-cmd>
//!             A shell command that prints the PID of the process to check, e.g. "systemctl show nginx
//!             --property=MainPID --value"
//!         --pid-timeout <SECONDS>
//!             Kill the pid command if it runs longer than this [default: 10]
//!
//!     -W, --warning <warning>
//!             Cpu percentage to warn at, as a Nagios range
//! ```
//!
//! # check-proc-tasks
//!
//! Tasks in the process's cgroup as a percentage of its limit.
//!
//! ```plain
//! $ check-proc-tasks --help
//! check-proc-tasks (part of proc-checks) 0.1.0
//! Check the tasks in a process's cgroup against the cgroup's limit
//!
//! Finds the cgroup with task accounting in /proc/<pid>/cgroup and compares its pids.current to pids.max. For a systemd
//! service that is TasksCurrent and TasksMax of the unit. Thresholds are Nagios ranges over the percentage of the limit
//! that is in use. A cgroup without a limit is always at 0%.
//!
//! USAGE:
//!     check-proc-tasks [FLAGS] [OPTIONS] --pid-cmd <pid-cmd>
//!
//! FLAGS:
//!     -D, --debug
//!             Log to stderr, and exit with the error instead of an UNKNOWN status
//!
//!     -h, --help
//!             Prints help information
//!
//!     -V, --version
//!             Prints version information
//!
//!
//! OPTIONS:
//!     -C, --critical <critical>
//!             Percent of the task limit to go critical at, as a Nagios range [default: 85]
//!
//!     -P, --pid-cmd <pid-cmd>
//!             A shell command that prints the PID of the process to check, e.g. "systemctl show nginx
//!             --property=MainPID --value"
//!         --pid-timeout <SECONDS>
//!             Kill the pid command if it runs longer than this [default: 10]
//!
//!     -W, --warning <warning>
//!             Percent of the task limit to warn at, as a Nagios range [default: 75]
//! ```
