// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Waiting for the engine to signal the end of a decode.

use std::os::fd::AsFd;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use anyhow::anyhow;
use nix::errno::Errno;
use nix::sys::epoll::Epoll;
use nix::sys::epoll::EpollCreateFlags;
use nix::sys::epoll::EpollEvent;
use nix::sys::epoll::EpollFlags;
use nix::sys::epoll::EpollTimeout;
use nix::sys::eventfd::EfdFlags;
use nix::sys::eventfd::EventFd;
use thiserror::Error;

/// Longest single epoll sleep. Longer timeouts are split into several waits.
const MAX_EPOLL_WAIT: Duration = Duration::from_secs(60);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitStatus {
    /// The expected number of completion events arrived.
    Completed,
    /// The timeout elapsed first.
    TimedOut,
}

/// Source of engine completion events, usually fed by the VE interrupt.
pub trait CompletionWait {
    /// Blocks until `events` completion events have been received or `timeout` has elapsed.
    fn wait(&mut self, events: u32, timeout: Duration) -> anyhow::Result<WaitStatus>;

    /// Drops any event received before this call, e.g. the late interrupt of a decode that timed
    /// out.
    fn reset(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum EventCompletionError {
    #[error("failed to create the completion EventFd: {0}")]
    EventFd(Errno),
    #[error("failed to create Epoll: {0}")]
    Epoll(Errno),
    #[error("failed to add the completion EventFd to Epoll: {0}")]
    EpollAdd(Errno),
}

/// Completion events delivered through an `EventFd`.
///
/// The interrupt handler writes 1 to the event for every completed picture.
pub struct EventCompletion {
    event: Arc<EventFd>,
    epoll: Epoll,
}

impl EventCompletion {
    /// Creates a new completion source with its own event.
    pub fn new() -> Result<Self, EventCompletionError> {
        let event = EventFd::from_flags(EfdFlags::EFD_SEMAPHORE | EfdFlags::EFD_NONBLOCK)
            .map_err(EventCompletionError::EventFd)?;

        Self::from_event(Arc::new(event))
    }

    /// Waits on `event`, which must have been created with `EFD_SEMAPHORE` and `EFD_NONBLOCK`.
    pub fn from_event(event: Arc<EventFd>) -> Result<Self, EventCompletionError> {
        let epoll = Epoll::new(EpollCreateFlags::empty()).map_err(EventCompletionError::Epoll)?;
        epoll
            .add(event.as_fd(), EpollEvent::new(EpollFlags::EPOLLIN, 1))
            .map_err(EventCompletionError::EpollAdd)?;

        Ok(Self { event, epoll })
    }

    /// The event to signal completions on.
    pub fn event(&self) -> Arc<EventFd> {
        Arc::clone(&self.event)
    }

    /// Consumes one pending event. Returns `false` if there was none.
    fn take_event(&self) -> anyhow::Result<bool> {
        match self.event.read() {
            Ok(_) => Ok(true),
            Err(Errno::EAGAIN) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl CompletionWait for EventCompletion {
    fn wait(&mut self, events: u32, timeout: Duration) -> anyhow::Result<WaitStatus> {
        // No deadline if it cannot be represented.
        let deadline = Instant::now().checked_add(timeout);
        let mut pending = events;

        while pending > 0 {
            if self.take_event()? {
                pending -= 1;
                continue;
            }

            let epoll_timeout = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        log::debug!("{} of {} completion events missing", pending, events);
                        return Ok(WaitStatus::TimedOut);
                    }

                    EpollTimeout::try_from(remaining.min(MAX_EPOLL_WAIT))
                        .map_err(|_| anyhow!("invalid epoll timeout {:?}", remaining))?
                }
                None => EpollTimeout::NONE,
            };
            let mut ready = [EpollEvent::empty()];
            match self.epoll.wait(&mut ready, epoll_timeout) {
                Ok(_) | Err(Errno::EINTR) => (),
                Err(e) => return Err(e.into()),
            }
        }

        Ok(WaitStatus::Completed)
    }

    fn reset(&mut self) -> anyhow::Result<()> {
        let mut dropped = 0;
        while self.take_event()? {
            dropped += 1;
        }
        if dropped > 0 {
            log::debug!("Dropped {} stale completion events", dropped);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::CompletionWait;
    use super::EventCompletion;
    use super::WaitStatus;

    #[test]
    fn already_signalled() {
        let mut completion = EventCompletion::new().unwrap();
        completion.event().write(1).unwrap();

        assert_eq!(completion.wait(1, Duration::from_secs(1)).unwrap(), WaitStatus::Completed);
    }

    #[test]
    fn times_out() {
        let mut completion = EventCompletion::new().unwrap();

        assert_eq!(completion.wait(1, Duration::from_millis(10)).unwrap(), WaitStatus::TimedOut);

        // One event is not enough when two are expected.
        completion.event().write(1).unwrap();
        assert_eq!(completion.wait(2, Duration::from_millis(10)).unwrap(), WaitStatus::TimedOut);
    }

    #[test]
    fn signalled_from_another_thread() {
        let mut completion = EventCompletion::new().unwrap();
        let event = completion.event();

        let signaller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            event.write(1).unwrap();
            event.write(1).unwrap();
        });

        assert_eq!(completion.wait(2, Duration::from_secs(5)).unwrap(), WaitStatus::Completed);
        signaller.join().unwrap();
    }

    #[test]
    fn unrepresentable_deadline() {
        let mut completion = EventCompletion::new().unwrap();
        completion.event().write(1).unwrap();

        assert_eq!(completion.wait(1, Duration::MAX).unwrap(), WaitStatus::Completed);

        let event = completion.event();
        let signaller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            event.write(1).unwrap();
        });

        assert_eq!(completion.wait(1, Duration::MAX).unwrap(), WaitStatus::Completed);
        signaller.join().unwrap();
    }

    #[test]
    fn reset_drops_stale_events() {
        let mut completion = EventCompletion::new().unwrap();
        completion.event().write(3).unwrap();
        completion.reset().unwrap();

        assert_eq!(completion.wait(1, Duration::from_millis(10)).unwrap(), WaitStatus::TimedOut);
    }
}
