use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::Event;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// Source of terminal events.
pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

/// Reads events from the controlling terminal through crossterm.
#[derive(Debug, Default)]
pub struct CrosstermDriver;

impl InputDriver for CrosstermDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        crossterm::event::read()
    }
}

/// Replays a fixed list of events, then reports none. Used for headless runs.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    events: VecDeque<Event>,
}

impl ScriptedDriver {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputDriver for ScriptedDriver {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

/// Drives the UI thread: polls the driver and hands every event to one
/// handler.
///
/// The handler is called with `None` once per iteration before polling (the
/// place to draw), then with `Some(event)` for each queued event. Background
/// producers run on their own threads and only touch shared state.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(None)? {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain bursts (drags, scrolling) before the next draw so
                // rendering never falls behind the input stream.
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bursts_are_drained_between_draws() {
        let events = vec![Event::FocusGained, Event::FocusLost, Event::Resize(4, 4)];
        let mut event_loop = EventLoop::new(ScriptedDriver::new(events), Duration::ZERO);
        let mut trace = Vec::new();
        event_loop
            .run(|event| {
                let flow = match (&event, trace.len()) {
                    (None, n) if n > 0 => ControlFlow::Quit,
                    _ => ControlFlow::Continue,
                };
                trace.push(event.is_some());
                Ok(flow)
            })
            .unwrap();
        // one draw, three events, then the second draw quits
        assert_eq!(trace, vec![false, true, true, true, false]);
        assert_eq!(event_loop.driver().remaining(), 0);
    }

    #[test]
    fn quit_from_event_stops_immediately() {
        let events = vec![Event::FocusGained, Event::FocusLost];
        let mut event_loop = EventLoop::new(ScriptedDriver::new(events), Duration::ZERO);
        event_loop
            .run(|event| {
                Ok(if event.is_some() {
                    ControlFlow::Quit
                } else {
                    ControlFlow::Continue
                })
            })
            .unwrap();
        assert_eq!(event_loop.driver().remaining(), 1);
    }
}
