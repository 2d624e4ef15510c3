//! The seam between whatever produces readings and the localizer.

/// A reading from one microphone, in units of volume.
pub type Reading = f64;

/// `SignalSource`
///
/// Anything that can report one scalar reading per active microphone. The
/// order of the readings is the order of the microphones, and every poll
/// produces a fresh snapshot. The simulated implementation is
/// [SensorArray](crate::sensor_array::SensorArray).
pub trait SignalSource {
    /// Returns the current reading of every active microphone.
    fn poll_signals(&self) -> Vec<Reading>;

    /// How many microphones are feeding readings.
    fn num_active_mics(&self) -> usize;
}
