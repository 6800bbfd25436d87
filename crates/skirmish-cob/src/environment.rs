//! Per-unit script state: statics and threads.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ScriptError;
use crate::script::CobScript;
use crate::thread::{CobThread, ThreadId};

/// Script state owned by one unit.
///
/// Threads are kept in a [`BTreeMap`] keyed by [`ThreadId`], so every
/// replica visits them in the same (creation) order. A thread being
/// executed is detached with [`take_thread`](Self::take_thread) and put
/// back with [`restore_thread`](Self::restore_thread); the interpreter
/// can then borrow the thread and the environment independently.
#[derive(Clone, Debug)]
pub struct CobEnvironment {
    script: Arc<CobScript>,
    statics: Vec<i32>,
    threads: BTreeMap<ThreadId, CobThread>,
    next_thread_id: u32,
}

impl CobEnvironment {
    /// A fresh environment with zeroed statics and no threads.
    pub fn new(script: Arc<CobScript>) -> Self {
        let statics = vec![0; script.static_variable_count];
        Self {
            script,
            statics,
            threads: BTreeMap::new(),
            next_thread_id: 0,
        }
    }

    /// The compiled script.
    pub fn script(&self) -> &Arc<CobScript> {
        &self.script
    }

    /// Read a static variable.
    pub fn get_static(&self, index: u32) -> Result<i32, ScriptError> {
        self.statics
            .get(index as usize)
            .copied()
            .ok_or(ScriptError::StaticOutOfRange {
                index,
                count: self.statics.len(),
            })
    }

    /// Write a static variable.
    pub fn set_static(&mut self, index: u32, value: i32) -> Result<(), ScriptError> {
        let count = self.statics.len();
        let slot = self
            .statics
            .get_mut(index as usize)
            .ok_or(ScriptError::StaticOutOfRange { index, count })?;
        *slot = value;
        Ok(())
    }

    /// All static variables.
    pub fn statics(&self) -> &[i32] {
        &self.statics
    }

    /// Start a thread at function `function`.
    pub fn create_thread(
        &mut self,
        function: u32,
        params: impl IntoIterator<Item = i32>,
        signal_mask: u32,
    ) -> Result<ThreadId, ScriptError> {
        let info = self
            .script
            .function(function)
            .ok_or(ScriptError::UnknownFunction { index: function })?;
        let thread = CobThread::new(info.name.clone(), info.address, params, signal_mask);
        let id = ThreadId(self.next_thread_id);
        self.next_thread_id += 1;
        self.threads.insert(id, thread);
        log::debug!("started script thread {id} ({})", info.name);
        Ok(id)
    }

    /// Start a thread at the function called `name`.
    ///
    /// Returns `None` if the script has no such function. Scripts
    /// routinely omit optional entry points, so this is not a fault.
    pub fn create_thread_by_name(
        &mut self,
        name: &str,
        params: impl IntoIterator<Item = i32>,
    ) -> Option<ThreadId> {
        let function = self.script.find_function(name)?;
        self.create_thread(function, params, 0).ok()
    }

    /// Kill every thread whose signal mask shares a bit with `signal`.
    ///
    /// `sender` is never killed. Returns the number of threads removed.
    pub fn send_signal(&mut self, signal: u32, sender: Option<ThreadId>) -> usize {
        let before = self.threads.len();
        self.threads
            .retain(|id, t| Some(*id) == sender || t.signal_mask & signal == 0);
        let killed = before - self.threads.len();
        if killed > 0 {
            log::debug!("signal {signal:#x} killed {killed} thread(s)");
        }
        killed
    }

    /// Ids of all threads, in creation order.
    pub fn thread_ids(&self) -> Vec<ThreadId> {
        self.threads.keys().copied().collect()
    }

    /// The thread with id `id`.
    pub fn thread(&self, id: ThreadId) -> Option<&CobThread> {
        self.threads.get(&id)
    }

    /// The thread with id `id`, mutably.
    pub fn thread_mut(&mut self, id: ThreadId) -> Option<&mut CobThread> {
        self.threads.get_mut(&id)
    }

    /// All threads, in creation order.
    pub fn threads(&self) -> impl Iterator<Item = (ThreadId, &CobThread)> {
        self.threads.iter().map(|(id, t)| (*id, t))
    }

    /// Number of live threads.
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Detach a thread for execution.
    pub fn take_thread(&mut self, id: ThreadId) -> Option<CobThread> {
        self.threads.remove(&id)
    }

    /// Reattach a thread previously taken with
    /// [`take_thread`](Self::take_thread).
    pub fn restore_thread(&mut self, id: ThreadId, thread: CobThread) {
        self.threads.insert(id, thread);
    }

    /// Remove a thread permanently.
    pub fn remove_thread(&mut self, id: ThreadId) -> Option<CobThread> {
        self.threads.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::CobFunctionInfo;

    fn script() -> Arc<CobScript> {
        Arc::new(CobScript {
            instructions: vec![],
            functions: vec![
                CobFunctionInfo {
                    name: "Create".to_string(),
                    address: 0,
                },
                CobFunctionInfo {
                    name: "Open".to_string(),
                    address: 3,
                },
            ],
            pieces: vec![],
            static_variable_count: 2,
        })
    }

    #[test]
    fn statics_are_bounds_checked() {
        let mut env = CobEnvironment::new(script());
        env.set_static(1, 9).unwrap();
        assert_eq!(env.get_static(1), Ok(9));
        assert_eq!(env.statics(), &[0, 9]);
        assert_eq!(
            env.get_static(2),
            Err(ScriptError::StaticOutOfRange { index: 2, count: 2 })
        );
        assert!(env.set_static(5, 0).is_err());
    }

    #[test]
    fn thread_ids_are_monotonic() {
        let mut env = CobEnvironment::new(script());
        let a = env.create_thread(0, [], 0).unwrap();
        let b = env.create_thread_by_name("open", [1]).unwrap();
        assert!(a < b);
        assert_eq!(env.thread_ids(), vec![a, b]);
        assert_eq!(env.thread(b).unwrap().name, "Open");
        assert_eq!(env.thread(b).unwrap().frame().unwrap().instruction_index, 3);
        assert_eq!(env.create_thread_by_name("Killed", []), None);
        assert_eq!(
            env.create_thread(7, [], 0),
            Err(ScriptError::UnknownFunction { index: 7 })
        );
    }

    #[test]
    fn signal_kills_matching_threads_except_sender() {
        let mut env = CobEnvironment::new(script());
        let a = env.create_thread(0, [], 0b01).unwrap();
        let b = env.create_thread(0, [], 0b10).unwrap();
        let c = env.create_thread(0, [], 0b11).unwrap();
        assert_eq!(env.send_signal(0b01, Some(c)), 1);
        assert!(env.thread(a).is_none());
        assert!(env.thread(b).is_some());
        assert!(env.thread(c).is_some());
        assert_eq!(env.send_signal(0b100, None), 0);
    }

    #[test]
    fn detached_thread_round_trips() {
        let mut env = CobEnvironment::new(script());
        let a = env.create_thread(0, [], 0).unwrap();
        let t = env.take_thread(a).unwrap();
        assert_eq!(env.thread_count(), 0);
        env.restore_thread(a, t);
        assert_eq!(env.thread_ids(), vec![a]);
    }
}
