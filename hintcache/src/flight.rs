// Copyright 2025 hintcache Project Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::future::Future;

use hashbrown::HashMap;
use parking_lot::Mutex;
use tokio::sync::oneshot;

type Notifier<T> = oneshot::Sender<T>;
type Inflights<T> = Mutex<HashMap<String, Vec<Notifier<T>>>>;

/// Single-flight call coalescer.
///
/// For every key, at most one computation runs at a time. Callers that arrive while a computation of the same key
/// is outstanding wait for it and receive a clone of its result. The in-flight record is removed as soon as the
/// computation finishes, so the next call starts a fresh computation.
pub struct Flight<T> {
    inflights: Inflights<T>,
}

impl<T> Default for Flight<T> {
    fn default() -> Self {
        Self {
            inflights: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> Flight<T>
where
    T: Clone + Send + 'static,
{
    /// Create an empty coalescer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` for `key`, or wait for the outstanding computation of `key`.
    ///
    /// If the caller that runs the computation is cancelled before it finishes, its waiters start over and one of
    /// them runs its own `f`.
    pub async fn run<F, FU>(&self, key: &str, f: F) -> T
    where
        F: FnOnce() -> FU,
        FU: Future<Output = T>,
    {
        loop {
            let waiter = {
                let mut inflights = self.inflights.lock();
                match inflights.get_mut(key) {
                    Some(notifiers) => {
                        let (tx, rx) = oneshot::channel();
                        notifiers.push(tx);
                        Some(rx)
                    }
                    None => {
                        inflights.insert(key.to_string(), vec![]);
                        None
                    }
                }
            };

            if let Some(rx) = waiter {
                match rx.await {
                    Ok(value) => return value,
                    Err(_) => {
                        tracing::debug!(key, "[flight]: leader cancelled, retry");
                        continue;
                    }
                }
            }

            let leader = Leader {
                inflights: &self.inflights,
                key,
                finished: false,
            };
            let value = f().await;
            let notifiers = leader.finish();
            for notifier in notifiers {
                let _ = notifier.send(value.clone());
            }
            return value;
        }
    }

    #[cfg(test)]
    pub(crate) fn waiters(&self, key: &str) -> Option<usize> {
        self.inflights.lock().get(key).map(|notifiers| notifiers.len())
    }
}

/// Owns the in-flight record of a key while its computation runs.
///
/// Dropping an unfinished leader removes the record, which closes the channels of all waiters.
struct Leader<'a, T> {
    inflights: &'a Inflights<T>,
    key: &'a str,
    finished: bool,
}

impl<T> Leader<'_, T> {
    fn finish(mut self) -> Vec<Notifier<T>> {
        self.finished = true;
        self.inflights.lock().remove(self.key).unwrap_or_default()
    }
}

impl<T> Drop for Leader<'_, T> {
    fn drop(&mut self) {
        if !self.finished {
            self.inflights.lock().remove(self.key);
        }
    }
}
