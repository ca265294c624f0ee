// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Software stand-ins for the VE, recording what would have been sent to the hardware.
//!
//! These let the decoding logic run without a device, to test it or to inspect the register
//! sequence produced for a given picture.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use crate::device::cedar::completion::CompletionWait;
use crate::device::cedar::completion::WaitStatus;
use crate::device::cedar::regs;
use crate::device::cedar::RegisterSpace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterWrite {
    pub offset: u32,
    pub value: u32,
}

impl fmt::Display for RegisterWrite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match regs::name(self.offset) {
            Some(name) => write!(f, "{:<20} <- {:#010x}", name, self.value),
            None => write!(f, "{:<20} <- {:#010x}", format!("{:#05x}", self.offset), self.value),
        }
    }
}

/// Register space that keeps register values in memory and records every write.
#[derive(Clone, Debug, Default)]
pub struct RegisterTrace {
    values: HashMap<u32, u32>,
    writes: Vec<RegisterWrite>,
}

impl RegisterTrace {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the value of a register without recording a write, e.g. to model its reset value.
    pub fn preset(&mut self, offset: u32, value: u32) -> &mut Self {
        self.values.insert(offset, value);
        self
    }

    /// All writes recorded so far, oldest first.
    pub fn writes(&self) -> &[RegisterWrite] {
        &self.writes
    }

    /// Values written to `offset`, oldest first.
    pub fn writes_to(&self, offset: u32) -> Vec<u32> {
        self.writes.iter().filter(|w| w.offset == offset).map(|w| w.value).collect()
    }

    /// Forgets recorded writes but keeps register values.
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl RegisterSpace for RegisterTrace {
    fn read(&self, offset: u32) -> u32 {
        self.values.get(&offset).copied().unwrap_or(0)
    }

    fn write(&mut self, offset: u32, value: u32) {
        self.values.insert(offset, value);
        self.writes.push(RegisterWrite { offset, value });
    }
}

/// Completion source replaying a script of outcomes. Once the script is exhausted every wait
/// completes.
#[derive(Clone, Debug, Default)]
pub struct ScriptedCompletion {
    script: VecDeque<Result<WaitStatus, String>>,
    waits: Vec<(u32, Duration)>,
    resets: usize,
    reset_failure: Option<String>,
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Default::default()
    }

    /// Makes the next wait report `status`.
    pub fn then(&mut self, status: WaitStatus) -> &mut Self {
        self.script.push_back(Ok(status));
        self
    }

    /// Makes the next wait fail with `message`.
    pub fn then_fail(&mut self, message: &str) -> &mut Self {
        self.script.push_back(Err(message.to_string()));
        self
    }

    /// Makes the next reset fail with `message`.
    pub fn fail_next_reset(&mut self, message: &str) -> &mut Self {
        self.reset_failure = Some(message.to_string());
        self
    }

    /// The `(events, timeout)` arguments of every wait so far.
    pub fn waits(&self) -> &[(u32, Duration)] {
        &self.waits
    }

    pub fn resets(&self) -> usize {
        self.resets
    }
}

impl CompletionWait for ScriptedCompletion {
    fn wait(&mut self, events: u32, timeout: Duration) -> anyhow::Result<WaitStatus> {
        self.waits.push((events, timeout));
        match self.script.pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(WaitStatus::Completed),
        }
    }

    fn reset(&mut self) -> anyhow::Result<()> {
        self.resets += 1;
        match self.reset_failure.take() {
            Some(message) => Err(anyhow::anyhow!(message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::RegisterTrace;
    use super::RegisterWrite;
    use super::ScriptedCompletion;
    use crate::device::cedar::completion::CompletionWait;
    use crate::device::cedar::completion::WaitStatus;
    use crate::device::cedar::regs::VE_CTRL;
    use crate::device::cedar::regs::VE_MPEG_TRIGGER;
    use crate::device::cedar::RegisterSpace;

    #[test]
    fn records_writes() {
        let mut trace = RegisterTrace::new();
        trace.preset(VE_CTRL, 0x0013_0007);

        assert_eq!(trace.read(VE_CTRL), 0x0013_0007);
        assert_eq!(trace.read(0x1fc), 0);
        assert!(trace.writes().is_empty());

        trace.write(VE_CTRL, 0x0013_0000);
        trace.write(VE_MPEG_TRIGGER, 0x8100_000f);
        trace.write(VE_CTRL, 0x0013_0007);

        assert_eq!(trace.read(VE_CTRL), 0x0013_0007);
        assert_eq!(trace.writes_to(VE_CTRL), vec![0x0013_0000, 0x0013_0007]);
        assert_eq!(
            trace.writes()[1],
            RegisterWrite {
                offset: VE_MPEG_TRIGGER,
                value: 0x8100_000f
            }
        );

        trace.clear_writes();
        assert!(trace.writes().is_empty());
        assert_eq!(trace.read(VE_MPEG_TRIGGER), 0x8100_000f);
    }

    #[test]
    fn display_write() {
        let write = RegisterWrite {
            offset: VE_MPEG_TRIGGER,
            value: 0x8100_000f,
        };
        assert_eq!(write.to_string(), "VE_MPEG_TRIGGER      <- 0x8100000f");

        let write = RegisterWrite {
            offset: 0x1fc,
            value: 1,
        };
        assert_eq!(write.to_string(), "0x1fc                <- 0x00000001");
    }

    #[test]
    fn scripted_completion() {
        let mut completion = ScriptedCompletion::new();
        completion.then(WaitStatus::TimedOut).then_fail("bus error");

        let timeout = Duration::from_millis(5);
        assert_eq!(completion.wait(1, timeout).unwrap(), WaitStatus::TimedOut);
        assert_eq!(completion.wait(1, timeout).unwrap_err().to_string(), "bus error");
        assert_eq!(completion.wait(2, timeout).unwrap(), WaitStatus::Completed);
        assert_eq!(completion.waits(), &[(1, timeout), (1, timeout), (2, timeout)]);

        completion.reset().unwrap();
        assert_eq!(completion.resets(), 1);

        completion.fail_next_reset("eventfd closed");
        assert_eq!(completion.reset().unwrap_err().to_string(), "eventfd closed");
        completion.reset().unwrap();
        assert_eq!(completion.resets(), 3);
    }
}
