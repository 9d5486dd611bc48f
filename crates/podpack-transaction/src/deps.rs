use podpack_core::{is_app_ref, runtime_from_metadata};
use podpack_store::BundleStore;

// Check the scope itself, and the system scope when this is a user scope.
// Installing into the system scope must never depend on a user-only runtime,
// but a user install may be satisfied from either side.
pub(crate) fn ref_is_installed(store: &dyn BundleStore, bundle_ref: &str) -> bool {
    if store.get_if_deployed(bundle_ref).is_some() {
        return true;
    }

    if store.is_user() {
        if let Some(system) = store.system() {
            return system.get_if_deployed(bundle_ref).is_some();
        }
    }

    false
}

// Absence, never an error: a missing cache entry or unreadable metadata is
// treated as "no declared runtime" and planning proceeds.
pub(crate) fn fetch_runtime_ref(
    store: &dyn BundleStore,
    remote: &str,
    bundle_ref: &str,
) -> Option<String> {
    if !is_app_ref(bundle_ref) {
        return None;
    }

    let metadata = store.fetch_ref_cache(remote, bundle_ref)?;
    let text = String::from_utf8(metadata).ok()?;
    runtime_from_metadata(&text)
}
