//! Environment and worker helpers for the embedded cluster.

use super::BoxError;
use super::fs_utils::open_parent_dir;
#[cfg(unix)]
use cap_std::fs::{Permissions, PermissionsExt};
use pg_embedded_setup_unpriv::{ExecutionPrivileges, detect_execution_privileges};
use std::env;
use std::ffi::OsString;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
static PREPARED_WORKER: OnceLock<OsString> = OnceLock::new();

/// Guard that applies a scoped environment variable update.
pub(super) struct EnvVarGuard {
    previous: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Sets multiple environment variables for the guard lifetime.
    pub(super) fn set_many(changes: &[(OsString, Option<OsString>)]) -> Self {
        let lock = ENV_MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut previous = Vec::with_capacity(changes.len());

        for (key, value) in changes {
            previous.push((key.clone(), env::var_os(key)));
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(new_value) => env::set_var(key, new_value),
                    None => env::remove_var(key),
                }
            }
        }

        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(previous) => env::set_var(&key, &previous),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}

pub(super) fn env_vars_to_os(
    env_vars: &[(String, Option<String>)],
) -> Vec<(OsString, Option<OsString>)> {
    env_vars
        .iter()
        .map(|(key, value)| (OsString::from(key), value.as_ref().map(OsString::from)))
        .collect()
}

/// Environment overrides applied while the cluster bootstraps.
pub(super) fn worker_env_changes() -> Result<Vec<(OsString, Option<OsString>)>, BoxError> {
    let mut changes = Vec::new();
    if let Some(port) = resolve_pg_port()? {
        changes.push((OsString::from("PG_PORT"), Some(port)));
    }

    if matches!(detect_execution_privileges(), ExecutionPrivileges::Root)
        && env::var_os("PG_EMBEDDED_WORKER").is_none()
    {
        let worker_path = locate_pg_worker_in_path().ok_or_else(|| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "PG_EMBEDDED_WORKER is not set and no pg_worker binary is on PATH",
            )) as BoxError
        })?;
        let prepared = prepare_pg_worker(&worker_path)?;
        changes.push((OsString::from("PG_EMBEDDED_WORKER"), Some(prepared)));
    }

    Ok(changes)
}

fn resolve_pg_port() -> Result<Option<OsString>, BoxError> {
    if env::var_os("PG_PORT").is_some() {
        return Ok(None);
    }

    let listener = TcpListener::bind(("127.0.0.1", 0)).map_err(|err| Box::new(err) as BoxError)?;
    let port = listener
        .local_addr()
        .map(|addr| addr.port())
        .map_err(|err| Box::new(err) as BoxError)?;
    drop(listener);

    Ok(Some(OsString::from(port.to_string())))
}

fn locate_pg_worker_in_path() -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join("pg_worker"))
        .find(|candidate| candidate.is_file())
}

/// Copies the worker somewhere the unprivileged cluster user can execute it.
fn prepare_pg_worker(worker: &Path) -> Result<OsString, BoxError> {
    if let Some(cached) = PREPARED_WORKER.get() {
        return Ok(cached.clone());
    }

    let destination_path = env::temp_dir().join(format!("pg_worker_{}", std::process::id()));
    let (source_dir, source_name) = open_parent_dir(worker)?;
    let (destination_dir, destination_name) = open_parent_dir(&destination_path)?;

    match destination_dir.remove_file(destination_name) {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(Box::new(err) as BoxError),
    }
    source_dir
        .copy(source_name, &destination_dir, destination_name)
        .map_err(|err| Box::new(err) as BoxError)?;

    #[cfg(unix)]
    {
        destination_dir
            .set_permissions(destination_name, Permissions::from_mode(0o755))
            .map_err(|err| Box::new(err) as BoxError)?;
    }

    Ok(PREPARED_WORKER
        .get_or_init(|| destination_path.into_os_string())
        .clone())
}

#[cfg(test)]
mod tests {
    use super::{EnvVarGuard, env_vars_to_os};
    use std::ffi::OsString;

    #[test]
    fn guard_restores_previous_values() {
        let key = OsString::from("WORKTALLY_CLUSTER_GUARD_CHECK");
        let guard = EnvVarGuard::set_many(&[(key.clone(), Some(OsString::from("set")))]);
        assert_eq!(std::env::var_os(&key), Some(OsString::from("set")));
        drop(guard);
        assert_eq!(std::env::var_os(&key), None);
    }

    #[test]
    fn env_vars_convert_unset_entries() {
        let converted = env_vars_to_os(&[
            ("PGUSER".to_owned(), Some("postgres".to_owned())),
            ("TZ".to_owned(), None),
        ]);
        assert_eq!(
            converted,
            vec![
                (OsString::from("PGUSER"), Some(OsString::from("postgres"))),
                (OsString::from("TZ"), None),
            ]
        );
    }
}
