//! Package actions delivered by the dependency manager.

use std::fmt;

use super::descriptor::ComposerPackage;

/// Kind of package operation that triggered a translation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Install,
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => write!(f, "install"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// A post-install or post-update notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEvent {
    pub operation: Operation,
    /// Package before the operation. Only set for updates.
    pub initial: Option<ComposerPackage>,
    /// Package after the operation.
    pub target: ComposerPackage,
}

impl PackageEvent {
    pub fn install(package: ComposerPackage) -> Self {
        Self {
            operation: Operation::Install,
            initial: None,
            target: package,
        }
    }

    pub fn update(initial: ComposerPackage, target: ComposerPackage) -> Self {
        Self {
            operation: Operation::Update,
            initial: Some(initial),
            target,
        }
    }

    /// The package whose translations should be fetched.
    ///
    /// Always the resulting package; for an update that is the target.
    pub fn package(&self) -> &ComposerPackage {
        &self.target
    }
}
