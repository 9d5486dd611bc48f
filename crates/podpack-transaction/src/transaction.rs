use std::collections::HashMap;
use std::io::{self, Write};

use anyhow::{anyhow, Result};
use podpack_core::{decompose_ref, pretty_ref, runtime_ref, Subpaths, TransactionError};
use podpack_store::BundleStore;

use crate::chooser::{RemoteChooser, TerminalChooser};
use crate::deps::{fetch_runtime_ref, ref_is_installed};
use crate::oci::{parse_commit_annotations, DirOciClient, OciClient};
use crate::operation::Operation;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    pub no_pull: bool,
    pub no_deploy: bool,
    pub add_deps: bool,
    pub add_related: bool,
}

// Owns the plan: an insertion-ordered operation list plus a by-ref index.
// Each ref appears at most once; duplicate requests merge into the existing
// operation. Execution happens in insertion order, so a dependency enqueued
// while planning its dependent always runs first.
pub struct Transaction<'a> {
    pub(crate) store: &'a dyn BundleStore,
    pub(crate) options: TransactionOptions,
    chooser: Box<dyn RemoteChooser + 'a>,
    oci: Box<dyn OciClient + 'a>,
    pub(crate) out: Box<dyn Write + 'a>,
    pub(crate) err: Box<dyn Write + 'a>,
    pub(crate) ops: Vec<Operation>,
    pub(crate) by_ref: HashMap<String, usize>,
}

impl<'a> Transaction<'a> {
    pub fn new(store: &'a dyn BundleStore, options: TransactionOptions) -> Self {
        Self {
            store,
            options,
            chooser: Box::new(TerminalChooser),
            oci: Box::new(DirOciClient),
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
            ops: Vec::new(),
            by_ref: HashMap::new(),
        }
    }

    pub fn with_chooser(mut self, chooser: impl RemoteChooser + 'a) -> Self {
        self.chooser = Box::new(chooser);
        self
    }

    pub fn with_oci_client(mut self, oci: impl OciClient + 'a) -> Self {
        self.oci = Box::new(oci);
        self
    }

    pub fn with_output(mut self, out: impl Write + 'a, err: impl Write + 'a) -> Self {
        self.out = Box::new(out);
        self.err = Box::new(err);
        self
    }

    pub fn contains(&self, bundle_ref: &str) -> bool {
        self.by_ref.contains_key(bundle_ref)
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    pub fn add_install(
        &mut self,
        remote: &str,
        bundle_ref: &str,
        subpaths: Option<Vec<String>>,
    ) -> Result<()> {
        // An install with no subpath filter pulls everything.
        let subpaths = match subpaths {
            None => Subpaths::All,
            Some(list) => Subpaths::from_list(list),
        };
        self.add_ref(Some(remote), bundle_ref, subpaths, None, false)
    }

    pub fn add_update(
        &mut self,
        bundle_ref: &str,
        subpaths: Option<Vec<String>>,
        commit: Option<String>,
    ) -> Result<()> {
        self.add_ref(None, bundle_ref, Subpaths::from_option(subpaths), commit, true)
    }

    pub fn add_install_from_oci(&mut self, uri: &str, tag: &str) -> Result<()> {
        let registry = self.oci.open_registry(uri)?;
        let manifest = registry.choose_image(tag)?;

        let (bundle_ref, checksum) = parse_commit_annotations(&manifest.annotations);
        let Some(bundle_ref) = bundle_ref else {
            return Err(TransactionError::NotABundleImage.into());
        };

        let parts = decompose_ref(&bundle_ref)?;
        let pretty = parts.pretty();
        let title = format!("OCI remote for {pretty}");
        let id = format!("oci-{pretty}");

        let remote = self
            .store
            .create_origin_remote(&id, &title, &bundle_ref, uri, tag)?;
        self.store.recreate_repo()?;
        log::debug!("added OCI origin remote {remote}");

        self.add_ref(Some(&remote), &bundle_ref, Subpaths::All, checksum, false)
    }

    fn add_ref(
        &mut self,
        remote: Option<&str>,
        bundle_ref: &str,
        subpaths: Subpaths,
        commit: Option<String>,
        is_update: bool,
    ) -> Result<()> {
        let pretty = pretty_ref(bundle_ref)?.to_string();

        let remote = if is_update {
            let Some(deploy) = self.store.get_deploy_data(bundle_ref) else {
                return Err(TransactionError::NotInstalled(pretty).into());
            };
            if self.store.remote_disabled(&deploy.origin) {
                log::debug!("remote {} disabled, ignoring {pretty} update", deploy.origin);
                return Ok(());
            }
            deploy.origin
        } else {
            let Some(remote) = remote else {
                return Err(anyhow!("install requires a remote"));
            };
            if self.store.get_deploy_data(bundle_ref).is_some() {
                return Err(TransactionError::AlreadyInstalled(pretty).into());
            }
            remote.to_string()
        };

        if self.options.add_deps {
            // A dependency that cannot be resolved does not abort planning;
            // the miss resurfaces at execution time.
            let _ = self.resolve_deps(&remote, bundle_ref);
        }

        self.add_op(&remote, bundle_ref, subpaths, commit, !is_update, is_update);

        self.resolve_related(&remote, bundle_ref)?;
        Ok(())
    }

    fn resolve_deps(&mut self, remote: &str, bundle_ref: &str) -> Result<()> {
        let Some(runtime) = fetch_runtime_ref(self.store, remote, bundle_ref) else {
            return Ok(());
        };

        let pretty = pretty_ref(bundle_ref)?.to_string();
        let full_runtime_ref = runtime_ref(&runtime);

        if self.contains(&full_runtime_ref) {
            return Ok(());
        }

        let mut runtime_remote = None;
        if !ref_is_installed(self.store, &full_runtime_ref) {
            writeln!(
                self.out,
                "Required runtime for {pretty} ({runtime}) is not installed, searching..."
            )?;

            let remotes = self.store.search_for_dependency(&full_runtime_ref);
            if remotes.is_empty() {
                writeln!(
                    self.out,
                    "The required runtime {runtime} was not found in a configured remote."
                )?;
            } else {
                runtime_remote = self.chooser.choose_remote(&mut *self.out, &remotes)?;
            }

            let Some(chosen) = runtime_remote.clone() else {
                return Err(TransactionError::RuntimeMissing {
                    app: pretty,
                    runtime,
                }
                .into());
            };

            // Whether the runtime will be present by the time this operation
            // executes is unknown; the executor narrows the intent.
            self.add_op(&chosen, &full_runtime_ref, Subpaths::Inherit, None, true, true);
        } else if let Some(deploy) = self.store.get_deploy_data(&full_runtime_ref) {
            // Installed in this very scope: refresh it alongside.
            runtime_remote = Some(deploy.origin.clone());
            self.add_op(
                &deploy.origin,
                &full_runtime_ref,
                Subpaths::Inherit,
                None,
                false,
                true,
            );
        }

        if let Some(chosen) = runtime_remote {
            self.resolve_related(&chosen, &full_runtime_ref)?;
        }
        Ok(())
    }

    fn resolve_related(&mut self, remote: &str, bundle_ref: &str) -> Result<()> {
        if !self.options.add_related {
            return Ok(());
        }

        let related = if self.options.no_pull {
            self.store.find_local_related(bundle_ref, remote)
        } else {
            self.store.find_remote_related(bundle_ref, remote)
        };

        match related {
            Err(err) => {
                writeln!(self.err, "Warning: Problem looking for related refs: {err:#}")?;
            }
            Ok(entries) => {
                for related_ref in entries {
                    if !related_ref.download {
                        continue;
                    }
                    let op = self.add_op(
                        remote,
                        &related_ref.bundle_ref,
                        related_ref.subpaths,
                        None,
                        true,
                        true,
                    );
                    op.non_fatal = true;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn add_op(
        &mut self,
        remote: &str,
        bundle_ref: &str,
        subpaths: Subpaths,
        commit: Option<String>,
        install: bool,
        update: bool,
    ) -> &mut Operation {
        log::debug!(
            "transaction: {} {remote}:{bundle_ref}{}{}",
            crate::operation::intent_name(install, update),
            commit
                .as_deref()
                .map(|commit| format!("@{commit}"))
                .unwrap_or_default(),
            subpaths.render()
        );

        let index = match self.by_ref.get(bundle_ref) {
            Some(&index) => {
                let op = &mut self.ops[index];
                // Only replace subpaths when a filter is already recorded:
                // an unfiltered request always wins over a filtered one.
                if op.subpaths.is_filtered() && !matches!(subpaths, Subpaths::Inherit) {
                    op.subpaths = subpaths;
                }
                index
            }
            None => {
                let index = self.ops.len();
                self.ops.push(Operation {
                    remote: remote.to_string(),
                    bundle_ref: bundle_ref.to_string(),
                    subpaths,
                    commit,
                    install,
                    update,
                    non_fatal: false,
                });
                self.by_ref.insert(bundle_ref.to_string(), index);
                index
            }
        };

        &mut self.ops[index]
    }
}
