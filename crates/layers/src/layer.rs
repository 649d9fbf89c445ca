#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

pub trait Layer {
    fn id(&self) -> LayerId;

    /// Bumped on every rebuild; renderers compare it to skip redundant uploads.
    fn generation(&self) -> u64;
}
