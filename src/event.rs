use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::{debug, error};

/// Everything the main loop reacts to arrives through one channel, so clock ticks
/// and key presses are applied one at a time in arrival order.
pub enum AppEvent {
    Key(KeyEvent),
    /// Stamped when produced; the exam timer converts these into whole seconds.
    Tick(Instant),
    Resize,
}

/// The event thread holds the only sender. If it stops, `next` reports the
/// disconnect instead of blocking, and the main loop exits.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                // Ticks keep their cadence even while keys stream in.
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());
                let ready = match event::poll(timeout) {
                    Ok(ready) => ready,
                    Err(e) => {
                        error!(error = %e, "terminal poll failed, event thread stopping");
                        return;
                    }
                };
                if ready {
                    let sent = match event::read() {
                        // Release/repeat reports would double-apply answers.
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            tx.send(AppEvent::Key(key))
                        }
                        Ok(Event::Resize(..)) => tx.send(AppEvent::Resize),
                        _ => Ok(()),
                    };
                    if sent.is_err() {
                        debug!("event receiver dropped");
                        return;
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    last_tick = Instant::now();
                    if tx.send(AppEvent::Tick(last_tick)).is_err() {
                        return;
                    }
                }
            }
        });

        Self::from_receiver(rx)
    }

    fn from_receiver(rx: mpsc::Receiver<AppEvent>) -> Self {
        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        self.rx
            .recv()
            .map_err(|_| anyhow::anyhow!("terminal event thread stopped"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_delivers_queued_events() {
        let (tx, rx) = mpsc::channel();
        let events = EventHandler::from_receiver(rx);
        let now = Instant::now();
        tx.send(AppEvent::Tick(now)).unwrap();

        assert!(matches!(events.next(), Ok(AppEvent::Tick(t)) if t == now));
    }

    #[test]
    fn next_fails_once_the_event_thread_is_gone() {
        let (tx, rx) = mpsc::channel();
        let events = EventHandler::from_receiver(rx);
        tx.send(AppEvent::Resize).unwrap();
        drop(tx);

        assert!(matches!(events.next(), Ok(AppEvent::Resize)));
        assert!(events.next().is_err());
    }
}
