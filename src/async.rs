/// Async utilities.
use std::future::Future;

use itertools::Itertools;
use tokio::task::JoinSet;

use crate::error::BlogErr;

/// try_map spawns a future for each item in the iterator and waits for all of them to complete.
/// If any of the futures return an error, try_map will return that error.
/// The futures are spawned in chunks of 50. Output order is completion order.
pub async fn try_map<T, I, F, O, Fut>(input: I, f: F) -> Result<Vec<O>, BlogErr>
where
    I: IntoIterator<Item = T>,
    F: Fn(T) -> Fut + Send + 'static,
    Fut: Future<Output = Result<O, BlogErr>> + Send + 'static,
    T: Send + 'static,
    O: Send + 'static,
{
    let iterator = input.into_iter();
    let (lower_bound, _) = iterator.size_hint();
    let mut output = Vec::with_capacity(lower_bound);

    for chunk in &iterator.chunks(50) {
        let mut set = JoinSet::new();
        for item in chunk {
            set.spawn(f(item));
        }

        while let Some(res) = set.join_next().await {
            output.push(res??);
        }
    }

    Ok(output)
}
