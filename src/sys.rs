//! Interact with the `/sys` pseudo-file system

pub mod fs {
    //! Interact with the /sys/fs file system
    pub mod cgroup {
        //! Interact with cgroups mounted under `/sys/fs/cgroup`
        //!
        //! Both layouts are supported: v1 mounts each controller in its own
        //! directory, the unified (v2) hierarchy puts every controller's files
        //! in the group's one directory.

        use std::path::PathBuf;

        use crate::procfs::pid::CGroup;

        const ROOT: &str = "/sys/fs/cgroup";

        /// The directory holding `controller`'s files for `group`
        pub fn dir(group: &CGroup, controller: &str) -> PathBuf {
            let mut dir = PathBuf::from(ROOT);
            if !group.is_unified() {
                dir.push(controller);
            }
            dir.push(group.path.trim_start_matches('/'));
            dir
        }

        pub mod pids {
            //! The pids controller, which is what systemd's `TasksCurrent` and
            //! `TasksMax` are read from
            //!
            //! https://www.kernel.org/doc/Documentation/cgroup-v1/pids.txt

            use std::io;
            use std::path::Path;

            use super::dir;
            use crate::procfs::pid::CGroup;
            use crate::procfs::{read_file, ProcFsError, Result};

            /// Tasks in a cgroup and the most it may have
            #[derive(Clone, Copy, Debug, PartialEq, Eq)]
            pub struct Pids {
                pub current: u64,
                /// `None` if the limit is `max`
                pub max: Option<u64>,
            }

            impl Pids {
                pub fn load(group: &CGroup) -> Result<Pids> {
                    Pids::from_dir(&dir(group, "pids"))
                }

                /// Read `pids.current` and `pids.max` from a cgroup directory
                ///
                /// The root cgroup and groups without task accounting have no
                /// such files, which is reported as missing data rather than
                /// as a missing file so it can't be mistaken for the process
                /// having exited.
                pub fn from_dir(dir: &Path) -> Result<Pids> {
                    let read = |name: &str| {
                        let path = dir.join(name);
                        read_file(&path).map_err(|e| match e.io_kind() {
                            Some(io::ErrorKind::NotFound) => ProcFsError::InsufficientData(
                                format!("task accounting is not enabled: no {}", path.display()),
                            ),
                            _ => e,
                        })
                    };
                    let current = read("pids.current")?.trim().parse()?;
                    let max = match read("pids.max")?.trim() {
                        "max" => None,
                        max => Some(max.parse()?),
                    };
                    Ok(Pids { current, max })
                }
            }
        }
    }
}

#[cfg(test)]
mod unit {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::fs::cgroup::dir;
    use super::fs::cgroup::pids::Pids;
    use crate::procfs::pid::CGroup;
    use crate::procfs::ProcFsError;

    fn group(line: &str) -> CGroup {
        line.parse().unwrap()
    }

    /// A scratch cgroup directory holding the given files
    fn scratch(name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("proc-checks-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        for (file, contents) in files {
            fs::write(dir.join(file), contents).unwrap();
        }
        dir
    }

    #[test]
    fn directories_for_both_layouts() {
        assert_eq!(
            dir(&group("5:pids:/system.slice/nginx.service"), "pids"),
            Path::new("/sys/fs/cgroup/pids/system.slice/nginx.service")
        );
        assert_eq!(
            dir(&group("0::/system.slice/nginx.service"), "pids"),
            Path::new("/sys/fs/cgroup/system.slice/nginx.service")
        );
        assert_eq!(dir(&group("0::/"), "pids"), Path::new("/sys/fs/cgroup"));
    }

    #[test]
    fn reads_limited_and_unlimited_groups() {
        let limited = scratch("limited", &[("pids.current", "12\n"), ("pids.max", "4915\n")]);
        assert_eq!(
            Pids::from_dir(&limited).unwrap(),
            Pids {
                current: 12,
                max: Some(4915)
            }
        );

        let unlimited = scratch("unlimited", &[("pids.current", "3\n"), ("pids.max", "max\n")]);
        assert_eq!(
            Pids::from_dir(&unlimited).unwrap(),
            Pids {
                current: 3,
                max: None
            }
        );

        let _ = fs::remove_dir_all(limited);
        let _ = fs::remove_dir_all(unlimited);
    }

    #[test]
    fn missing_accounting_is_not_a_missing_process() {
        let empty = scratch("empty", &[]);
        match Pids::from_dir(&empty) {
            Err(ProcFsError::InsufficientData(msg)) => {
                assert!(msg.contains("task accounting is not enabled"), "{}", msg)
            }
            other => panic!("expected missing data, got {:?}", other),
        }

        let garbage = scratch("garbage", &[("pids.current", "lots"), ("pids.max", "max")]);
        match Pids::from_dir(&garbage) {
            Err(ProcFsError::InvalidInt(_)) => {}
            other => panic!("expected a bad int, got {:?}", other),
        }

        let _ = fs::remove_dir_all(empty);
        let _ = fs::remove_dir_all(garbage);
    }
}
