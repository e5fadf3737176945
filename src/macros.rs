//! Variadic constructors for the persistent collections.

/// Builds a [`List`](crate::persistent::List) from zero or more elements, in
/// order.
///
/// # Examples
///
/// ```
/// use trieseq::list;
///
/// let empty: trieseq::persistent::List<i32> = list![];
/// assert!(empty.is_empty());
///
/// let list = list![1, 2, 3];
/// assert_eq!(list.to_string(), "( 1 2 3 )");
/// ```
#[macro_export]
macro_rules! list {
    () => {
        $crate::persistent::List::new()
    };

    ($($element:expr),+ $(,)?) => {
        $crate::persistent::List::from_values([$($element),+])
    };
}

/// Builds a [`Set`](crate::persistent::Set) from zero or more elements.
///
/// # Examples
///
/// ```
/// use trieseq::set;
///
/// let set = set![1, 2, 2, 3];
/// assert_eq!(set.len(), 3);
/// ```
#[macro_export]
macro_rules! set {
    () => {
        $crate::persistent::Set::new()
    };

    ($($element:expr),+ $(,)?) => {
        $crate::persistent::Set::from_values([$($element),+])
    };
}

/// Builds a [`HashMap`](crate::persistent::HashMap) from `key => value`
/// pairs. A repeated key keeps its last value.
///
/// # Examples
///
/// ```
/// use trieseq::hash_map;
///
/// let map = hash_map! { "one" => 1, "two" => 2 };
/// assert_eq!(map.get(&"two"), Some(&2));
/// ```
#[macro_export]
macro_rules! hash_map {
    () => {
        $crate::persistent::HashMap::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::persistent::HashMap::from_entries([$(($key, $value)),+])
    };
}

#[cfg(test)]
mod tests {
    use crate::persistent::{HashMap, List, Set};
    use rstest::rstest;

    #[rstest]
    fn test_list_keeps_order() {
        let list = list![3, 1, 2];
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![3, 1, 2]);
        let empty: List<i32> = list![];
        assert!(empty.is_empty());
    }

    #[rstest]
    fn test_set_deduplicates() {
        let set = set!["a", "b", "a",];
        assert_eq!(set.len(), 2);
        let empty: Set<i32> = set![];
        assert!(empty.is_empty());
    }

    #[rstest]
    fn test_hash_map_last_value_wins() {
        let map = hash_map! { 1 => "one", 1 => "uno", 2 => "two" };
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1), Some(&"uno"));
        let empty: HashMap<i32, i32> = hash_map! {};
        assert!(empty.is_empty());
    }
}
