use std::io::Write;

use anyhow::Result;
use podpack_core::{pretty_ref, CancellationToken, TransactionError};
use podpack_store::PullOptions;

use crate::operation::Operation;
use crate::transaction::Transaction;

impl Transaction<'_> {
    // Consumes the plan in insertion order. A non-fatal failure warns, a
    // fatal one either stops the run (stop_on_first_error) or marks the
    // whole transaction failed and keeps going.
    pub fn run(&mut self, stop_on_first_error: bool, cancel: &CancellationToken) -> Result<()> {
        let ops = std::mem::take(&mut self.ops);
        self.by_ref.clear();

        let mut failed = false;
        for mut op in ops {
            let Err(err) = self.execute_op(&mut op, cancel) else {
                continue;
            };

            let pretty = pretty_ref(&op.bundle_ref).unwrap_or(&op.bundle_ref);
            if op.non_fatal {
                writeln!(
                    self.err,
                    "Warning: Failed to {} {pretty}: {err:#}",
                    op.kind_name()
                )?;
            } else if !stop_on_first_error {
                writeln!(
                    self.err,
                    "Error: Failed to {} {pretty}: {err:#}",
                    op.kind_name()
                )?;
                failed = true;
            } else {
                return Err(err);
            }
        }

        if failed {
            return Err(TransactionError::Failed.into());
        }
        Ok(())
    }

    fn execute_op(&mut self, op: &mut Operation, cancel: &CancellationToken) -> Result<()> {
        cancel.check()?;

        // Dependency resolution enqueues install+update when it cannot know
        // whether the ref will be present by now. This is the decision point.
        if op.install && op.update {
            if self.store.get_deploy_data(&op.bundle_ref).is_some() {
                op.install = false;
            } else {
                op.update = false;
            }
        }

        let pretty = pretty_ref(&op.bundle_ref)
            .unwrap_or(&op.bundle_ref)
            .to_string();
        let pull = PullOptions {
            no_pull: self.options.no_pull,
            no_deploy: self.options.no_deploy,
        };

        if op.install {
            writeln!(self.out, "Installing: {pretty} from {}", op.remote)?;
            self.store
                .install(&pull, &op.bundle_ref, &op.remote, &op.subpaths, cancel)?;
            return Ok(());
        }

        writeln!(self.out, "Updating: {pretty} from {}", op.remote)?;
        match self.store.update(
            &pull,
            &op.bundle_ref,
            &op.remote,
            op.commit.as_deref(),
            &op.subpaths,
            cancel,
        ) {
            Ok(()) => {
                if let Some(deploy) = self.store.get_deploy_data(&op.bundle_ref) {
                    let short: String = deploy.commit.chars().take(12).collect();
                    writeln!(self.out, "Now at {short}.")?;
                }
                Ok(())
            }
            Err(err)
                if matches!(
                    err.downcast_ref::<TransactionError>(),
                    Some(TransactionError::AlreadyInstalled(_))
                ) =>
            {
                writeln!(self.out, "No updates.")?;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
