use log::{debug, error, info};

use crate::{Cascade, CascadeError, ResultTree, SelectionPath};

/// Walks a cascade like an odometer: the innermost field with an unexplored
/// option moves forward, its dependents refresh, and the new selection path
/// gets recorded.
pub struct Enumerator<'c, C: Cascade> {
    cascade: &'c mut C,
    tree: ResultTree,
    steps: usize,
}

impl<'c, C: Cascade> Enumerator<'c, C> {
    pub fn new(cascade: &'c mut C) -> Self {
        Self {
            cascade,
            tree: ResultTree::new(),
            steps: 0,
        }
    }

    pub fn tree(&self) -> &ResultTree {
        &self.tree
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Moves the last enabled field that still has a next option and waits
    /// for the cascade to settle.
    ///
    /// Returns the name of advanced field or `None` when every enabled field
    /// is already at its last option.
    pub fn advance(&mut self) -> Result<Option<String>, CascadeError> {
        let fields = self.cascade.fields()?;
        let target = fields
            .iter()
            .rev()
            .filter(|field| field.is_enabled())
            .find_map(|field| field.next_index().map(|index| (field, index)));
        let (field, index) = match target {
            Some(target) => target,
            None => return Ok(None),
        };
        debug!(
            "advance {} to #{index} {:?}",
            field.name, field.options[index].value
        );
        self.cascade.select(&field.name, index)?;
        self.cascade.settle()?;
        self.steps += 1;
        Ok(Some(field.name.clone()))
    }

    pub fn current_path(&self) -> Result<SelectionPath, CascadeError> {
        let fields = self.cascade.fields()?;
        Ok(SelectionPath::read(&fields))
    }

    pub fn record(&mut self, path: &SelectionPath) -> usize {
        self.tree.record(path)
    }

    /// Enumerates the cascade until no field can be advanced. The starting
    /// selection is recorded too, it is empty when the cascade opens on placeholders.
    ///
    /// Any failure aborts the run and the partially built tree is dropped.
    pub fn run(mut self) -> Result<ResultTree, CascadeError> {
        if let Err(error) = self.enumerate() {
            error!(
                "unable to enumerate cascade after {} steps, {error}",
                self.steps
            );
            return Err(error);
        }
        info!(
            "cascade enumerated in {} steps, {} paths recorded",
            self.steps,
            self.tree.len()
        );
        Ok(self.tree)
    }

    fn enumerate(&mut self) -> Result<(), CascadeError> {
        let fields = self.cascade.fields()?;
        info!("enumerate cascade of {} fields", fields.len());
        self.record(&SelectionPath::read(&fields));
        while self.advance()?.is_some() {
            let path = self.current_path()?;
            self.record(&path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::setup_tests_logging;
    use crate::{Field, FieldOption, MemoryCascade, OptionSource, ResetSource};

    #[test]
    pub fn test_two_level_scenario() {
        setup_tests_logging();
        let mut cascade = MemoryCascade::new(
            vec![field("A", &["", "a1", "a2"]), field("B", &[])],
            |name: &str, path: &SelectionPath| match (name, path.value_of("A")) {
                ("B", Some(_)) => options(&["", "b1", "b2"]),
                _ => vec![],
            },
        );
        let tree = Enumerator::new(&mut cascade).run().expect("cascade enumerated");
        for a in ["a1", "a2"] {
            assert_eq!(tree.label(&[("A", a)]), Some(a.to_uppercase().as_str()));
            for b in ["b1", "b2"] {
                let label = tree.label(&[("A", a), ("B", b)]);
                assert_eq!(label, Some(b.to_uppercase().as_str()));
            }
        }
        assert_eq!(tree.leaves(), 4);
        assert_eq!(tree.len(), 6);
    }

    #[test]
    pub fn test_static_fan_out_product() {
        setup_tests_logging();
        let mut cascade = MemoryCascade::new(
            vec![
                field("A", &["a1", "a2", "a3"]),
                field("B", &["b1", "b2"]),
                field("C", &["c1", "c2"]),
            ],
            ResetSource,
        );
        let tree = Enumerator::new(&mut cascade).run().expect("cascade enumerated");
        assert_eq!(tree.leaves(), 3 * 2 * 2);
    }

    #[test]
    pub fn test_placeholders_never_recorded() {
        let mut cascade = MemoryCascade::new(
            vec![field("A", &["", "a1", "--", "a2"]), field("B", &[])],
            |_: &str, path: &SelectionPath| match path.value_of("A") {
                Some(_) => options(&["-1", "b1"]),
                None => vec![],
            },
        );
        let tree = Enumerator::new(&mut cascade).run().expect("cascade enumerated");
        let keys: Vec<_> = tree.queries().iter().map(|q| q.to_query_string()).collect();
        assert_eq!(keys, ["A=a1", "A=a1&B=b1", "A=a2", "A=a2&B=b1"]);
    }

    #[test]
    pub fn test_idempotence() {
        let first = run(vec![field("A", &["a1", "a2"]), field("B", &["b1", "b2"])]);
        let second = run(vec![field("A", &["a1", "a2"]), field("B", &["b1", "b2"])]);
        assert_eq!(first, second);
    }

    #[test]
    pub fn test_locked_field_is_recorded_but_not_advanced() {
        struct Frozen;

        impl OptionSource for Frozen {
            fn refresh(&mut self, field: &mut Field, _: &[Field]) -> Result<(), CascadeError> {
                field.reset();
                Ok(())
            }
        }

        let mut cascade = MemoryCascade::new(
            vec![
                field("A", &["a1", "a2"]),
                field("L", &["l1", "l2"]).disabled(true),
            ],
            Frozen,
        );
        let tree = Enumerator::new(&mut cascade).run().expect("cascade enumerated");
        assert!(tree.contains(&[("A", "a1"), ("L", "l1")]));
        assert!(tree.contains(&[("A", "a2"), ("L", "l1")]));
        assert!(!tree.contains(&[("A", "a1"), ("L", "l2")]));
    }

    #[test]
    pub fn test_every_step_advances_one_field() {
        let mut cascade = MemoryCascade::new(
            vec![field("A", &["a1", "a2"]), field("B", &["b1", "b2"])],
            ResetSource,
        );
        let mut enumerator = Enumerator::new(&mut cascade);
        let mut advanced = vec![];
        while let Some(name) = enumerator.advance().expect("advanced") {
            advanced.push(name);
        }
        assert_eq!(advanced, ["B", "A", "B"]);
        assert_eq!(enumerator.steps(), 3);
        assert_eq!(enumerator.advance().expect("terminal"), None);
    }

    #[test]
    pub fn test_tree_grows_monotonically() {
        let mut cascade = MemoryCascade::new(
            vec![
                field("A", &["", "a1", "a2"]),
                field("B", &["", "b1", "b2"]).disabled(true),
            ],
            ResetSource,
        );
        let mut enumerator = Enumerator::new(&mut cascade);
        let mut previous = vec![];
        while enumerator.advance().expect("advanced").is_some() {
            let path = enumerator.current_path().expect("path read");
            enumerator.record(&path);
            let current = enumerator.tree().queries();
            assert!(previous.iter().all(|query| current.contains(query)));
            previous = current;
        }
    }

    #[test]
    pub fn test_repeated_placeholders_terminate() {
        let mut cascade = MemoryCascade::new(
            vec![field("A", &["", "a1", "", "a2"]), field("B", &["", "b1"])],
            ResetSource,
        );
        let mut enumerator = Enumerator::new(&mut cascade);
        let mut advanced = vec![];
        while let Some(name) = enumerator.advance().expect("advanced") {
            advanced.push(name);
            assert!(advanced.len() <= 5, "cascade keeps cycling: {advanced:?}");
        }
        assert_eq!(advanced, ["A", "B", "A", "A", "B"]);
        let tree = run(vec![field("A", &["", "a1", "", "a2"]), field("B", &["", "b1"])]);
        let keys: Vec<_> = tree.queries().iter().map(|q| q.to_query_string()).collect();
        assert_eq!(keys, ["A=a1", "A=a1&B=b1", "A=a2", "A=a2&B=b1"]);
    }

    #[test]
    pub fn test_repeated_values_terminate() {
        let mut cascade = MemoryCascade::new(
            vec![field("A", &["a1", "a2", "a1", "a3"]), field("B", &["b1", "b2"])],
            ResetSource,
        );
        let mut enumerator = Enumerator::new(&mut cascade);
        let mut steps = 0;
        while enumerator.advance().expect("advanced").is_some() {
            steps += 1;
            assert!(steps <= 7, "cascade keeps cycling");
        }
        assert_eq!(enumerator.steps(), 4 * 2 - 1);
        let tree = run(vec![field("A", &["a1", "a2", "a1", "a3"]), field("B", &["b1", "b2"])]);
        assert_eq!(tree.leaves(), 3 * 2);
    }

    #[test]
    pub fn test_empty_cascade_terminates() {
        let tree = run(vec![]);
        assert!(tree.is_empty());
    }

    #[test]
    pub fn test_failure_aborts_run() {
        struct Broken;

        impl Cascade for Broken {
            fn fields(&self) -> Result<Vec<Field>, CascadeError> {
                Ok(vec![field("A", &["", "a1"])])
            }

            fn select(&mut self, field: &str, _option: usize) -> Result<(), CascadeError> {
                Err(CascadeError::FieldNotFound(field.to_string()))
            }

            fn settle(&mut self) -> Result<(), CascadeError> {
                Ok(())
            }
        }

        let result = Enumerator::new(&mut Broken).run();
        assert!(matches!(result, Err(CascadeError::FieldNotFound(name)) if name == "A"));
    }

    fn run(fields: Vec<Field>) -> ResultTree {
        let mut cascade = MemoryCascade::new(fields, ResetSource);
        Enumerator::new(&mut cascade).run().expect("cascade enumerated")
    }

    fn field(name: &str, values: &[&str]) -> Field {
        Field::new(name, options(values))
    }

    fn options(values: &[&str]) -> Vec<FieldOption> {
        values
            .iter()
            .map(|value| FieldOption::new(value, &value.to_uppercase()))
            .collect()
    }
}
