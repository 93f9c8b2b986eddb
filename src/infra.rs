use std::{fmt::Display, time::Instant};

use anyhow::{Result, anyhow};
use itertools::Itertools;

use crate::{
    key::Key,
    list::{Item, LazyList},
    seq::{Fibonacci, Squares, triangular},
};

/// What the command line asked of a sequence.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub keys: Vec<Key>,
    /// Most values printed for one slice.
    pub limit: usize,
    /// Append the list's state after all keys are evaluated.
    pub describe: bool,
}

pub type Runner = fn(&Request) -> Result<Vec<String>>;

pub static REGISTRY: &[(&str, Runner)] = &[
    ("countdown", countdown),
    ("fib", fib),
    ("naturals", naturals),
    ("squares", squares),
    ("triangular", triangular_numbers),
];

fn countdown(req: &Request) -> Result<Vec<String>> {
    evaluate(LazyList::new((0..=10u32).rev()), req)
}

fn fib(req: &Request) -> Result<Vec<String>> {
    evaluate(LazyList::new(Fibonacci::<u128>::new()), req)
}

fn naturals(req: &Request) -> Result<Vec<String>> {
    evaluate(LazyList::new(0u64..), req)
}

fn squares(req: &Request) -> Result<Vec<String>> {
    evaluate(LazyList::new(Squares::<u64>::new()), req)
}

fn triangular_numbers(req: &Request) -> Result<Vec<String>> {
    evaluate(LazyList::new(triangular()), req)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(k, _)| *k)
}

pub fn dispatch(name: &str, req: &Request) -> Result<Vec<String>> {
    let f = REGISTRY
        .iter()
        .find(|(k, _)| *k == name)
        .map(|(_, f)| *f)
        .ok_or_else(|| anyhow!("unknown sequence `{name}`"))?;
    f(req)
}

/// Looks up every key against one shared list, so later keys reuse what earlier ones pulled.
pub fn evaluate<I>(list: LazyList<I>, req: &Request) -> Result<Vec<String>>
where
    I: Iterator,
    I::Item: Clone + Display + std::fmt::Debug,
{
    let mut out = Vec::with_capacity(req.keys.len() + 1);
    for key in &req.keys {
        let span = tracing::info_span!("lookup", key = %key, realized = list.realized());
        let _enter = span.enter();
        let now = Instant::now();

        let rendered = match list.lookup(*key)? {
            Item::Value(v) => v.to_string(),
            Item::Slice(s) => {
                let mut s = s.peekable();
                let shown = s.by_ref().take(req.limit).join(", ");
                let more = if s.peek().is_some() { ", ..." } else { "" };
                format!("[{shown}{more}]")
            }
        };
        tracing::debug!(elapsed = now.elapsed().as_secs_f64(), "evaluated");
        out.push(format!("[{key}] = {rendered}"));
    }
    if req.describe {
        out.push(format!("{list:?}"));
    }
    Ok(out)
}
