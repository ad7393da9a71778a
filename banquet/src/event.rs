//! Serialized event stream for the table.
//!
//! Every observable line of the simulation goes through one [`EventLog`].
//! The sink mutex is the single serialization point: concurrent emitters
//! never interleave text, and the run flag is read under the same lock,
//! so once shutdown is decided no further gated line can appear.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::clock::SimClock;
use crate::shutdown::StopLatch;

/// Fixed vocabulary of observable philosopher events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEvent {
    ForkTaken,
    Thinking,
    Eating,
    Sleeping,
    Died,
}

impl fmt::Display for TableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TableEvent::ForkTaken => "has taken a fork",
            TableEvent::Thinking => "is thinking",
            TableEvent::Eating => "is eating",
            TableEvent::Sleeping => "is sleeping",
            TableEvent::Died => "died",
        };
        f.write_str(text)
    }
}

/// Timestamped, serialized writer for the event stream.
pub struct EventLog {
    clock: Arc<SimClock>,
    latch: Arc<StopLatch>,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl EventLog {
    /// Build a log writing to an arbitrary sink (tests inject a buffer).
    pub fn new(clock: Arc<SimClock>, latch: Arc<StopLatch>, sink: Box<dyn Write + Send>) -> Self {
        Self {
            clock,
            latch,
            sink: Mutex::new(sink),
        }
    }

    /// Build a log writing to stdout, the production stream.
    pub fn stdout(clock: Arc<SimClock>, latch: Arc<StopLatch>) -> Self {
        Self::new(clock, latch, Box::new(io::stdout()))
    }

    /// Emit `<elapsed-ms> <id> <message>` unless shutdown has been decided.
    ///
    /// The latch is read under the sink lock, so an emitter that lost the
    /// race with shutdown stays silent. Write failures are ignored.
    pub fn emit(&self, id: usize, event: TableEvent) {
        let mut sink = self.sink.lock().unwrap();
        if self.latch.is_running() {
            let _ = writeln!(sink, "{} {} {}", self.clock.now_ms(), id, event);
        }
    }

    /// Emit unconditionally. Reserved for the terminal `died` line, which
    /// is written after the latch has flipped and must still appear.
    pub fn emit_final(&self, id: usize, event: TableEvent) {
        let mut sink = self.sink.lock().unwrap();
        let _ = writeln!(sink, "{} {} {}", self.clock.now_ms(), id, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture() -> (EventLog, SharedBuf, Arc<StopLatch>) {
        let clock = Arc::new(SimClock::start());
        let latch = Arc::new(StopLatch::new());
        let buf = SharedBuf::default();
        let log = EventLog::new(clock, Arc::clone(&latch), Box::new(buf.clone()));
        (log, buf, latch)
    }

    fn lines(buf: &SharedBuf) -> Vec<String> {
        String::from_utf8(buf.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_line_carries_elapsed_id_and_message() {
        let (log, buf, _latch) = capture();
        log.emit(3, TableEvent::Thinking);

        let lines = lines(&buf);
        assert_eq!(lines.len(), 1);
        let fields: Vec<&str> = lines[0].splitn(3, ' ').collect();
        assert!(fields[0].parse::<u64>().is_ok());
        assert_eq!(fields[1], "3");
        assert_eq!(fields[2], "is thinking");
    }

    #[test]
    fn test_gated_emit_silent_after_shutdown() {
        let (log, buf, latch) = capture();
        log.emit(1, TableEvent::Eating);
        latch.request();
        log.emit(1, TableEvent::Sleeping);

        let lines = lines(&buf);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("is eating"));
    }

    #[test]
    fn test_final_emit_bypasses_latch() {
        let (log, buf, latch) = capture();
        latch.request();
        log.emit_final(2, TableEvent::Died);

        let lines = lines(&buf);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("2 died"));
    }
}
