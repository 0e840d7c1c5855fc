//! Frame loop thread: runs the movement engine at a fixed real-time rate.
//!
//! The engine moves into the thread. Commands arrive over an `mpsc` channel
//! and are queued for the next frame; every snapshot goes to the caller's
//! sink and is kept in shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use wayfarer_core::commands::EngineCommand;
use wayfarer_core::state::FrameSnapshot;
use wayfarer_sim::MovementEngine;

pub const DEFAULT_FRAME_RATE: u32 = 30;

/// Messages to the frame loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// Forwarded to the engine's command queue.
    Engine(EngineCommand),
    /// Stop after the current frame.
    Shutdown,
}

/// Nominal duration of one frame at `frame_rate` Hz.
pub fn frame_duration(frame_rate: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(frame_rate.max(1)))
}

pub struct GameLoop {
    command_tx: mpsc::Sender<LoopCommand>,
    latest_snapshot: Arc<Mutex<Option<FrameSnapshot>>>,
    thread: Option<JoinHandle<u64>>,
}

impl GameLoop {
    /// Move `engine` onto a new thread and start framing. `on_frame` sees
    /// every snapshot before it is stored.
    pub fn spawn<F>(engine: MovementEngine, frame_rate: u32, on_frame: F) -> std::io::Result<Self>
    where
        F: FnMut(&FrameSnapshot) + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel::<LoopCommand>();
        let latest_snapshot = Arc::new(Mutex::new(None));
        let shared = Arc::clone(&latest_snapshot);
        let period = frame_duration(frame_rate);

        let thread = std::thread::Builder::new()
            .name("wayfarer-frame-loop".into())
            .spawn(move || run_frame_loop(engine, command_rx, &shared, period, on_frame))?;
        info!(frame_rate, "frame loop started");

        Ok(Self {
            command_tx,
            latest_snapshot,
            thread: Some(thread),
        })
    }

    /// Queue `command` for the next frame. False once the loop has exited.
    pub fn send(&self, command: EngineCommand) -> bool {
        self.command_tx.send(LoopCommand::Engine(command)).is_ok()
    }

    pub fn latest_snapshot(&self) -> Option<FrameSnapshot> {
        match self.latest_snapshot.lock() {
            Ok(lock) => lock.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the loop and wait for it. Returns the number of frames run.
    pub fn shutdown(&mut self) -> u64 {
        let _ = self.command_tx.send(LoopCommand::Shutdown);
        let frames = self
            .thread
            .take()
            .and_then(|thread| thread.join().ok())
            .unwrap_or(0);
        debug!(frames, "frame loop stopped");
        frames
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.shutdown();
        }
    }
}

/// Runs until `Shutdown` or channel disconnect. Returns the frame count.
fn run_frame_loop<F>(
    mut engine: MovementEngine,
    command_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<FrameSnapshot>>,
    period: Duration,
    mut on_frame: F,
) -> u64
where
    F: FnMut(&FrameSnapshot),
{
    let mut frames = 0;
    let mut last_frame = Instant::now();
    let mut next_frame_time = last_frame;

    loop {
        // 1. Drain pending commands
        loop {
            match command_rx.try_recv() {
                Ok(LoopCommand::Engine(command)) => engine.queue_command(command),
                Ok(LoopCommand::Shutdown) => return frames,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return frames,
            }
        }

        // 2. Advance by real elapsed time
        let now = Instant::now();
        let elapsed = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;
        let snapshot = engine.frame(elapsed);
        frames += 1;

        // 3. Hand off
        on_frame(&snapshot);
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until the next frame
        next_frame_time += period;
        let now = Instant::now();
        if next_frame_time > now {
            std::thread::sleep(next_frame_time - now);
        } else if now - next_frame_time > period * 2 {
            // Too far behind; the engine's substep cap absorbs the gap.
            next_frame_time = now;
        }
    }
}
