//! Utility functions and traits for configuration

pub trait BundleContainer<B> {
    fn bundles(&self) -> &[B];

    fn name(bundle: &B) -> &str;

    fn find_bundle(&self, name: &str) -> Option<&B> {
        self.bundles().iter().find(|b| Self::name(b) == name)
    }
}
