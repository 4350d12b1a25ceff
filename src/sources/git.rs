//! Shallow git checkouts of a single tag or branch.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use git2::build::CheckoutBuilder;
use git2::{AutotagOption, FetchOptions, Repository};
use url::Url;

use crate::util::fs::ensure_dir;

/// A depth-1 checkout of one reference of a remote repository.
///
/// Local (`file://`) remotes are fetched in full.
pub struct GitCheckout {
    /// Remote repository URL
    remote: Url,

    /// Tag or branch name
    reference: String,

    /// Checkout directory
    dest: PathBuf,
}

impl GitCheckout {
    pub fn new(remote: Url, reference: impl Into<String>, dest: &Path) -> Self {
        GitCheckout {
            remote,
            reference: reference.into(),
            dest: dest.to_path_buf(),
        }
    }

    /// Refspecs fetched for the reference: tag first, then branch.
    fn refspecs(&self) -> [String; 2] {
        [
            format!("+refs/tags/{0}:refs/tags/{0}", self.reference),
            format!("+refs/heads/{0}:refs/remotes/origin/{0}", self.reference),
        ]
    }

    /// Fetch the reference with depth 1 and check it out into the
    /// destination. Returns the checked-out commit id.
    pub fn fetch(&self) -> Result<String> {
        tracing::info!("cloning {} at {}", self.remote, self.reference);

        ensure_dir(&self.dest)?;
        let repo = Repository::init(&self.dest).with_context(|| {
            format!("failed to initialize repository in {}", self.dest.display())
        })?;

        let mut remote = match repo.find_remote("origin") {
            Ok(remote) => remote,
            Err(_) => repo
                .remote("origin", self.remote.as_str())
                .with_context(|| format!("failed to add remote {}", self.remote))?,
        };

        let mut fetch_opts = FetchOptions::new();
        // libgit2's local transport cannot negotiate a shallow fetch.
        if self.remote.scheme() != "file" {
            fetch_opts.depth(1);
        }
        fetch_opts.download_tags(AutotagOption::None);

        let refspecs = self.refspecs();
        remote
            .fetch(&refspecs, Some(&mut fetch_opts), None)
            .with_context(|| format!("failed to fetch {} from {}", self.reference, self.remote))?;

        let commit = self.resolve(&repo)?;

        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        repo.checkout_tree(commit.as_object(), Some(&mut checkout))
            .with_context(|| format!("failed to check out {}", self.reference))?;
        repo.set_head_detached(commit.id())?;

        Ok(commit.id().to_string())
    }

    fn resolve<'r>(&self, repo: &'r Repository) -> Result<git2::Commit<'r>> {
        let candidates = [
            format!("refs/tags/{}", self.reference),
            format!("refs/remotes/origin/{}", self.reference),
        ];
        for name in &candidates {
            if let Ok(reference) = repo.find_reference(name) {
                return reference
                    .peel_to_commit()
                    .with_context(|| format!("`{}` does not point at a commit", name));
            }
        }
        bail!(
            "tag or branch `{}` not found on {}",
            self.reference,
            self.remote
        )
    }
}
