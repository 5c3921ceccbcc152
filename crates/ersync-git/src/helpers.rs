//! Shared git2 helpers: credentials, time conversion, ref resolution

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use git2::{Config, Cred, CredentialType, RemoteCallbacks, Repository};

use crate::{Error, Result};

/// Remote callbacks that authenticate through the host's git setup.
///
/// Tries the configured credential helper for plain-text credentials, then
/// the SSH agent.
pub fn remote_callbacks<'a>(config: Option<Config>) -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();

    callbacks.credentials(move |url, username, allowed| {
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT)
            && let Some(config) = config.as_ref()
            && let Ok(cred) = Cred::credential_helper(config, url, username)
        {
            return Ok(cred);
        }
        if allowed.contains(CredentialType::SSH_KEY) {
            return Cred::ssh_key_from_agent(username.unwrap_or("git"));
        }
        if allowed.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }
        Err(git2::Error::from_str("no usable credentials for remote"))
    });

    callbacks
}

/// Convert a chrono timestamp into a git timestamp, keeping its offset.
pub fn git_time(at: &DateTime<FixedOffset>) -> git2::Time {
    git2::Time::new(at.timestamp(), at.offset().local_minus_utc() / 60)
}

/// Convert a git timestamp into a chrono timestamp, keeping its offset.
pub fn datetime_from_git(time: git2::Time) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)
        .unwrap_or_else(|| Utc.fix());
    offset
        .timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_default()
}

/// Commit the remote-tracking ref `tracking_ref` points at.
pub fn tracking_commit<'r>(
    repo: &'r Repository,
    tracking_ref: &str,
    remote: &str,
    branch: &str,
) -> Result<git2::Commit<'r>> {
    let reference = repo
        .find_reference(tracking_ref)
        .map_err(|_| Error::RemoteBranchNotFound {
            remote: remote.to_string(),
            branch: branch.to_string(),
        })?;
    Ok(reference.peel_to_commit()?)
}
