//! # Pitch Tuner GUI
//!
//! The main GUI application for the real-time pitch tuner. It shows the
//! detected note on a needle gauge, highlights the nearest key on a
//! piano-style keyboard, scrolls the recent pitch history, and can play a
//! fixed 440 Hz reference tone.
//!
//! ## Architecture
//! - **Main Thread**: Iced GUI application with dark theme
//! - **Audio Thread**: Dedicated thread owning the tuner session
//! - **Communication**: Crossbeam channels for thread-safe data exchange
//! - **Updates**: 60 FPS continuous updates via subscription system

mod ui;

use crossbeam_channel::{Receiver, Sender};
use iced::{self, Element, Subscription, Theme};
use std::thread::{self, JoinHandle};
use tuner_core::history::HistoryBuffer;
use tuner_core::session::TunerSession;
use tuner_core::tone::ReferenceTone;
use tuner_core::{TickResult, TunerConfig};
use ui::main_display::create_main_view;

/// Main entry point for the tuner application.
pub fn main() -> iced::Result {
    eprintln!("[MAIN] Starting tuner application...");
    let result = iced::application("Pitch Tuner", TunerApp::update, TunerApp::view)
        .subscription(TunerApp::subscription)
        .theme(TunerApp::theme)
        .run();
    eprintln!("[MAIN] Application finished with result: {:?}", result);
    result
}

/// Application message types for the Iced GUI framework.
#[derive(Debug, Clone)]
pub enum Message {
    /// Start or stop the tuner session
    ToggleTuner,
    /// Start or stop the 440 Hz reference tone
    ToggleReferenceTone,
    /// Application exit request
    Exit,
    /// Timer tick for real-time updates
    Tick,
}

/// UI-specific data needed for rendering the interface.
///
/// The pitch history lives here, on the presentation side: the core only
/// produces the per-tick samples appended to it.
pub struct AppDisplayData {
    pub tuner_active: bool,
    pub tone_active: bool,
    pub last_tick: Option<TickResult>,
    pub history: HistoryBuffer,
    pub config: TunerConfig,
}

/// Main application state for the pitch tuner.
struct TunerApp {
    // Audio processing components
    audio_worker: Option<AudioWorker>,
    tick_receiver: Option<Receiver<TickResult>>,

    // Reference tone thread
    tone_worker: Option<ToneWorker>,

    // Single source of truth for all display data
    display_data: AppDisplayData,
}

/// Audio worker thread management structure.
///
/// Handles the dedicated audio processing thread and provides
/// a way to shut it down gracefully.
struct AudioWorker {
    shutdown_tx: Sender<()>,
    thread_handle: Option<JoinHandle<()>>,
}

/// Reference tone thread management structure. The cpal output stream is
/// not `Send`, so the tone lives on its own thread for its whole lifetime.
struct ToneWorker {
    shutdown_tx: Sender<()>,
    thread_handle: Option<JoinHandle<()>>,
}

impl Default for TunerApp {
    fn default() -> Self {
        eprintln!("[MAIN] Creating TunerApp...");
        let config = TunerConfig::default();
        Self {
            audio_worker: None,
            tick_receiver: None,
            tone_worker: None,
            display_data: AppDisplayData {
                tuner_active: false,
                tone_active: false,
                last_tick: None,
                history: HistoryBuffer::new(config.history_len),
                config,
            },
        }
    }
}

impl TunerApp {
    /// Starts the dedicated audio processing thread.
    ///
    /// The thread owns the tuner session end to end: it acquires the
    /// microphone, runs the pipeline over every captured frame, and sends
    /// each `TickResult` back over the tick channel.
    fn start_tuner(&mut self) {
        let (tick_tx, tick_rx) = crossbeam_channel::unbounded();
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
        let config = self.display_data.config;

        let thread_handle = thread::spawn(move || {
            eprintln!("[AUDIO-THREAD] Starting tuner session...");
            let mut session = TunerSession::new(config);
            let (frame_rx, sample_rate) = match session.start() {
                Ok(pair) => pair,
                Err(e) => {
                    eprintln!("[AUDIO-THREAD] Fatal error starting audio: {}", e);
                    return;
                }
            };

            loop {
                crossbeam_channel::select! {
                    recv(frame_rx) -> msg => match msg {
                        Ok(frame) => {
                            match session.process_frame(&frame, sample_rate) {
                                Ok(tick) => {
                                    if tick_tx.send(tick).is_err() {
                                        eprintln!("[AUDIO-THREAD] Tick channel closed");
                                        break;
                                    }
                                }
                                Err(e) => {
                                    eprintln!("[AUDIO-THREAD] Pipeline error: {}", e);
                                    break;
                                }
                            }
                        }
                        Err(_) => {
                            eprintln!("[AUDIO-THREAD] Capture channel closed");
                            break;
                        }
                    },
                    recv(shutdown_rx) -> _ => {
                        eprintln!("[AUDIO-THREAD] Received shutdown signal");
                        break;
                    }
                }
            }

            session.stop();
            eprintln!("[AUDIO-THREAD] Audio thread finished");
        });

        self.audio_worker = Some(AudioWorker {
            shutdown_tx,
            thread_handle: Some(thread_handle),
        });
        self.tick_receiver = Some(tick_rx);
        self.display_data.tuner_active = true;
    }

    /// Shuts down the audio thread; the session's `stop` runs on the
    /// thread before it exits, so no frames arrive after this returns.
    fn stop_tuner(&mut self) {
        if let Some(mut worker) = self.audio_worker.take() {
            eprintln!("[MAIN] Shutting down audio worker...");
            let _ = worker.shutdown_tx.send(());
            if let Some(handle) = worker.thread_handle.take() {
                let _ = handle.join();
            }
        }
        self.tick_receiver = None;
        self.display_data.tuner_active = false;
        self.display_data.last_tick = None;
    }

    /// Starts or stops the reference tone thread.
    fn toggle_reference_tone(&mut self) {
        if let Some(mut worker) = self.tone_worker.take() {
            let _ = worker.shutdown_tx.send(());
            if let Some(handle) = worker.thread_handle.take() {
                let _ = handle.join();
            }
            self.display_data.tone_active = false;
            return;
        }

        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
        let reference_pitch = self.display_data.config.reference_pitch;
        let thread_handle = thread::spawn(move || {
            let mut tone = ReferenceTone::new(reference_pitch);
            if let Err(e) = tone.start() {
                eprintln!("[TONE-THREAD] Failed to start reference tone: {}", e);
                return;
            }
            // Parked until shutdown; the tone plays from the stream callback.
            let _ = shutdown_rx.recv();
            tone.stop();
        });

        self.tone_worker = Some(ToneWorker {
            shutdown_tx,
            thread_handle: Some(thread_handle),
        });
        self.display_data.tone_active = true;
    }

    /// Handles application state updates based on incoming messages.
    fn update(&mut self, message: Message) {
        match message {
            Message::Exit => {
                eprintln!("[MAIN] Window close requested - starting cleanup...");
                self.stop_tuner();
                if let Some(mut worker) = self.tone_worker.take() {
                    let _ = worker.shutdown_tx.send(());
                    if let Some(handle) = worker.thread_handle.take() {
                        let _ = handle.join();
                    }
                }
                eprintln!("[MAIN] Cleanup completed - exiting");
                std::process::exit(0);
            }
            Message::ToggleTuner => {
                if self.display_data.tuner_active {
                    self.stop_tuner();
                } else {
                    eprintln!("[MAIN] Starting audio processing...");
                    self.start_tuner();
                }
            }
            Message::ToggleReferenceTone => {
                self.toggle_reference_tone();
            }
            Message::Tick => {
                // Continuous update - poll for pipeline results
                if let Some(receiver) = &self.tick_receiver {
                    let mut ticks = Vec::new();
                    while let Ok(tick) = receiver.try_recv() {
                        ticks.push(tick);
                    }
                    for tick in ticks {
                        self.process_tick(tick);
                    }
                }
            }
        }
    }

    /// Applies one pipeline tick to the display state: one history sample
    /// per tick regardless of outcome, plus the latest note readout.
    fn process_tick(&mut self, tick: TickResult) {
        self.display_data.history.push(tick.raw_estimate);
        self.display_data.last_tick = Some(tick);
    }

    /// Renders the main application interface.
    ///
    /// Delegates all UI rendering to the main_display module,
    /// keeping this function focused on application logic only.
    fn view(&self) -> Element<'_, Message> {
        create_main_view(&self.display_data)
    }

    /// Creates a subscription for continuous application updates.
    ///
    /// Fires every 16ms (60 FPS) to keep the needle and history smooth.
    fn subscription(&self) -> Subscription<Message> {
        iced::time::every(std::time::Duration::from_millis(16)).map(|_| Message::Tick)
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}
