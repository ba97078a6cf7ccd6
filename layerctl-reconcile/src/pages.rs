//! Lazy iteration over inventory pages.

use layerctl_core::FunctionRecord;

use crate::error::ProviderError;
use crate::provider::FunctionInventory;

/// Finite, non-restartable sequence of inventory pages.
///
/// Each `next()` issues one listing call. The continuation marker stays
/// private to the iterator. A failed call is yielded once and ends the
/// sequence.
#[derive(Debug)]
pub struct Pages<'a, I: ?Sized> {
    inventory: &'a I,
    marker: Option<String>,
    done: bool,
}

/// Start paging through `inventory` from the first page.
pub fn pages<I: FunctionInventory + ?Sized>(inventory: &I) -> Pages<'_, I> {
    Pages {
        inventory,
        marker: None,
        done: false,
    }
}

impl<I: FunctionInventory + ?Sized> Iterator for Pages<'_, I> {
    type Item = Result<Vec<FunctionRecord>, ProviderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inventory.list_functions(self.marker.as_deref()) {
            Ok(page) => {
                self.marker = page.next_marker.filter(|m| !m.is_empty());
                self.done = self.marker.is_none();
                Some(Ok(page.functions))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use layerctl_core::FunctionName;

    use super::*;
    use crate::provider::FunctionPage;

    struct Scripted {
        pages: Vec<FunctionPage>,
        seen: RefCell<Vec<Option<String>>>,
        fail_at: Option<usize>,
    }

    impl FunctionInventory for Scripted {
        fn list_functions(&self, marker: Option<&str>) -> Result<FunctionPage, ProviderError> {
            let mut seen = self.seen.borrow_mut();
            seen.push(marker.map(str::to_owned));
            let index = seen.len() - 1;
            if self.fail_at == Some(index) {
                return Err(ProviderError::new("ListFunctions", "throttled"));
            }
            Ok(self.pages[index].clone())
        }
    }

    fn page(names: &[&str], next: Option<&str>) -> FunctionPage {
        FunctionPage {
            functions: names
                .iter()
                .map(|n| FunctionRecord {
                    name: FunctionName::from(*n),
                    arn: format!("arn:aws:lambda:us-west-2:1:function:{n}"),
                    runtime: Some("nodejs18.x".into()),
                    layers: vec![],
                    variables: Default::default(),
                })
                .collect(),
            next_marker: next.map(str::to_owned),
        }
    }

    #[test]
    fn follows_markers_until_absent() {
        let inv = Scripted {
            pages: vec![page(&["a", "b"], Some("m1")), page(&["c"], Some("m2")), page(&[], None)],
            seen: RefCell::new(vec![]),
            fail_at: None,
        };
        let all: Vec<_> = pages(&inv).collect::<Result<Vec<_>, _>>().expect("pages");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].len(), 2);
        assert_eq!(
            *inv.seen.borrow(),
            vec![None, Some("m1".to_string()), Some("m2".to_string())]
        );
    }

    #[test]
    fn empty_marker_ends_pagination() {
        let inv = Scripted {
            pages: vec![page(&["a"], Some(""))],
            seen: RefCell::new(vec![]),
            fail_at: None,
        };
        assert_eq!(pages(&inv).count(), 1);
    }

    #[test]
    fn error_is_yielded_once_then_stops() {
        let inv = Scripted {
            pages: vec![page(&["a"], Some("m1")), page(&["b"], None)],
            seen: RefCell::new(vec![]),
            fail_at: Some(1),
        };
        let mut it = pages(&inv);
        assert!(it.next().expect("first").is_ok());
        assert!(it.next().expect("second").is_err());
        assert!(it.next().is_none());
    }
}
