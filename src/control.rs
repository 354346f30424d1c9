// control.rs

use std::{io::Write, time::Instant};

use embedded_hal::digital::OutputPin;

use crate::*;

/// The hardware the control loop talks to.
pub struct Board<F, C, O, T, D, P> {
    /// JSON updates from the companion board.
    pub feed: F,
    /// Debug console input.
    pub console: C,
    /// Where console replies go.
    pub console_out: O,
    pub thermometer: T,
    pub display: D,
    /// Buzzer line mirroring the intruder flag.
    pub alarm: P,
}

/// Owns the sensor state and runs one pass of polling per `tick()`.
///
/// Steps run in a fixed order: feed, chip temperature, console, publish,
/// display. The http server only ever sees what `publish` sends.
pub struct Controller<F, C, O, T, D, P> {
    feed: LineReader<F>,
    console: LineReader<C>,
    console_out: O,
    thermometer: T,
    display: D,
    interpreter: Interpreter<P>,
    state: SensorState,
    publisher: watch::Sender<SensorReport>,
    sample_interval: Duration,
    last_sample: Option<Instant>,
    shown: Option<LcdFrame>,
}

impl<F, C, O, T, D, P> Controller<F, C, O, T, D, P>
where
    F: ByteSource,
    C: ByteSource,
    O: Write,
    T: Thermometer,
    D: StatusDisplay,
    P: OutputPin,
{
    pub fn new(
        board: Board<F, C, O, T, D, P>,
        config: &MyConfig,
        publisher: watch::Sender<SensorReport>,
    ) -> Self {
        Controller {
            feed: LineReader::new("feed", board.feed),
            console: LineReader::new("console", board.console),
            console_out: board.console_out,
            thermometer: board.thermometer,
            display: board.display,
            interpreter: Interpreter::new(board.alarm),
            state: SensorState::new(),
            publisher,
            sample_interval: Duration::from_millis(config.sample_interval_ms),
            last_sample: None,
            shown: None,
        }
    }

    pub fn state(&self) -> &SensorState {
        &self.state
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(line) = self.feed.poll_line() {
            if let Err(e) = self.state.update_from_feed(&line) {
                error!("{e}, line: {line:?}");
            }
        }

        let sample_due = match self.last_sample {
            None => true,
            Some(t) => now.saturating_duration_since(t) >= self.sample_interval,
        };
        if sample_due {
            match self.thermometer.read_celsius() {
                Ok(t) => self.state.internal_temperature = t,
                Err(e) => error!("Chip temperature read failed: {e:?}"),
            }
            self.last_sample = Some(now);
        }

        if let Some(line) = self.console.poll_line() {
            if let Some(reply) = self.interpreter.handle_line(&line, &mut self.state) {
                let res = writeln!(self.console_out, "{reply}")
                    .and_then(|_| self.console_out.flush());
                if let Err(e) = res {
                    error!("Console write failed: {e:?}");
                }
            }
        }

        self.publisher.send_replace(self.state.report());

        let frame = LcdFrame::from_state(&self.state);
        if self.shown.as_ref() != Some(&frame) {
            match self.display.show(&frame) {
                Ok(()) => self.shown = Some(frame),
                Err(e) => error!("{e:?}"),
            }
        }
    }

    pub async fn run(mut self, period: Duration) -> anyhow::Result<()> {
        info!("Control loop running, period {period:?}");
        loop {
            self.tick(Instant::now());
            sleep(period).await;
        }
    }
}

// EOF
