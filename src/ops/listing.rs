use crate::service::ServiceError;

use super::feedback::Feedback;

/// A fetched list plus its loading flag.
///
/// On failure the previous items stay in place (stale-on-error).
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub loading: bool,
    /// At least one fetch has succeeded
    pub loaded: bool,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Listing {
            items: Vec::new(),
            loading: false,
            loaded: false,
        }
    }
}

impl<T> Listing<T> {
    /// Fetch the full list and replace local state. `what` names the list
    /// in the failure toast ("projects" -> "Failed to load projects").
    pub fn load(
        &mut self,
        what: &str,
        feedback: &mut Feedback,
        fetch: impl FnOnce() -> Result<Vec<T>, ServiceError>,
    ) -> bool {
        self.loading = true;
        let result = fetch();
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.loaded = true;
                true
            }
            Err(e) => {
                feedback.failure(&format!("load {}", what), &e);
                false
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProjectId;

    #[test]
    fn success_replaces_items() {
        let mut listing: Listing<u32> = Listing::default();
        let mut feedback = Feedback::new();
        assert!(listing.load("numbers", &mut feedback, || Ok(vec![1, 2])));
        assert!(listing.load("numbers", &mut feedback, || Ok(vec![3])));
        assert_eq!(listing.items, vec![3]);
        assert!(listing.loaded);
        assert!(!listing.loading);
        assert!(feedback.latest().is_none());
    }

    #[test]
    fn failure_keeps_stale_items() {
        let mut listing: Listing<u32> = Listing::default();
        let mut feedback = Feedback::new();
        listing.load("numbers", &mut feedback, || Ok(vec![1, 2]));
        let ok = listing.load("numbers", &mut feedback, || {
            Err(ServiceError::ProjectNotFound(ProjectId::from("P-1")))
        });
        assert!(!ok);
        assert_eq!(listing.items, vec![1, 2]);
        assert!(!listing.loading);
        assert_eq!(feedback.latest().unwrap().message, "Failed to load numbers");
    }
}
