use podpack_core::Subpaths;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub remote: String,
    pub bundle_ref: String,
    pub subpaths: Subpaths,
    pub commit: Option<String>,
    pub install: bool,
    pub update: bool,
    pub non_fatal: bool,
}

impl Operation {
    pub(crate) fn kind_name(&self) -> &'static str {
        intent_name(self.install, self.update)
    }
}

pub(crate) fn intent_name(install: bool, update: bool) -> &'static str {
    if install {
        if update {
            "install/update"
        } else {
            "install"
        }
    } else {
        "update"
    }
}
