//! Ordered-bucket grouping with small pure reducers
//!
//! Buckets live in a `BTreeMap` and are folded in input order, so the same
//! rows always reduce to bit-identical results.

use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Folds the values of one bucket.
pub trait Reducer: Default {
    type Item;
    type Output;

    fn push(&mut self, item: Self::Item);
    fn finish(&self) -> Self::Output;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Sum<T>(T);

impl<T: AddAssign + Default + Copy> Reducer for Sum<T> {
    type Item = T;
    type Output = T;

    fn push(&mut self, item: T) {
        self.0 += item;
    }

    fn finish(&self) -> T {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Mean {
    total: f64,
    count: u64,
}

impl Reducer for Mean {
    type Item = f64;
    type Output = f64;

    fn push(&mut self, item: f64) {
        self.total += item;
        self.count += 1;
    }

    fn finish(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        self.total / self.count as f64
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Count(u64);

impl Reducer for Count {
    type Item = ();
    type Output = u64;

    fn push(&mut self, _: ()) {
        self.0 += 1;
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

impl<A: Reducer, B: Reducer, C: Reducer> Reducer for (A, B, C) {
    type Item = (A::Item, B::Item, C::Item);
    type Output = (A::Output, B::Output, C::Output);

    fn push(&mut self, (a, b, c): Self::Item) {
        self.0.push(a);
        self.1.push(b);
        self.2.push(c);
    }

    fn finish(&self) -> Self::Output {
        (self.0.finish(), self.1.finish(), self.2.finish())
    }
}

/// Reduce `items` into one bucket per key.
pub fn group_by<T, K, R>(
    items: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> K,
    value: impl Fn(&T) -> R::Item,
) -> BTreeMap<K, R::Output>
where
    K: Ord,
    R: Reducer,
{
    let mut buckets: BTreeMap<K, R> = BTreeMap::new();
    for item in items {
        buckets.entry(key(&item)).or_default().push(value(&item));
    }
    buckets.into_iter().map(|(k, r)| (k, r.finish())).collect()
}

/// Median of the non-NaN values; NaN when there are none.
pub fn median(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

pub fn mean(values: &[f64]) -> f64 {
    let mut reducer = Mean::default();
    for &v in values {
        reducer.push(v);
    }
    reducer.finish()
}
