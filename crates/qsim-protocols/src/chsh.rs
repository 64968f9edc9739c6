//! The CHSH nonlocal game.
//!
//! A referee sends one random bit to each of two players, who may not
//! communicate. They win when the parity of their answers equals the AND of
//! their inputs. Classical strategies win at most 75% of games; players
//! sharing a Bell pair win `cos²(π/8) ≈ 85.4%`.

use std::f64::consts::PI;

use rand::Rng;
use tracing::info;

use qsim_hal::{DeviceResult, EntanglingQubit, QuantumDevice, Qubit, RotationQubit};

use crate::error::{ProtocolError, ProtocolResult};

/// A way of playing one CHSH game.
///
/// Implementations must compute each player's answer from that player's own
/// input only.
pub trait ChshStrategy {
    /// Return `(your_answer, eve_answer)` for the given inputs.
    fn play(&self, your_input: bool, eve_input: bool) -> DeviceResult<(bool, bool)>;
}

/// Both players always answer 0. Wins 75% of games.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantStrategy;

impl ChshStrategy for ConstantStrategy {
    fn play(&self, _your_input: bool, _eve_input: bool) -> DeviceResult<(bool, bool)> {
        Ok((false, false))
    }
}

/// Players share a fresh Bell pair each game and measure after a
/// Y-rotation chosen by their input.
pub struct QuantumStrategy<D> {
    device: D,
    your_angles: [f64; 2],
    eve_angles: [f64; 2],
}

impl<D> QuantumStrategy<D>
where
    D: QuantumDevice,
    D::Qubit: EntanglingQubit + RotationQubit,
{
    /// Use the optimal angles: 90° / 0° for you, 45° / 135° for Eve.
    pub fn new(device: D) -> Self {
        Self::with_angles(device, [PI / 2.0, 0.0], [PI / 4.0, 3.0 * PI / 4.0])
    }

    /// Use custom measurement angles, indexed by each player's input.
    pub fn with_angles(device: D, your_angles: [f64; 2], eve_angles: [f64; 2]) -> Self {
        Self {
            device,
            your_angles,
            eve_angles,
        }
    }

    /// The device holding the shared pair.
    pub fn device(&self) -> &D {
        &self.device
    }
}

impl<D> ChshStrategy for QuantumStrategy<D>
where
    D: QuantumDevice,
    D::Qubit: EntanglingQubit + RotationQubit,
{
    fn play(&self, your_input: bool, eve_input: bool) -> DeviceResult<(bool, bool)> {
        self.device.with_register(2, |qs| {
            let (you, eve) = (&qs[0], &qs[1]);
            you.h()?;
            you.cnot(eve)?;

            you.ry(self.your_angles[usize::from(your_input)])?;
            let your_answer = you.measure()?;

            eve.ry(self.eve_angles[usize::from(eve_input)])?;
            let eve_answer = eve.measure()?;

            Ok((your_answer, eve_answer))
        })
    }
}

/// Play one game with inputs drawn from `rng`; `true` if the players won.
pub fn referee<S, R>(strategy: &S, rng: &mut R) -> DeviceResult<bool>
where
    S: ChshStrategy + ?Sized,
    R: Rng + ?Sized,
{
    let your_input: bool = rng.r#gen();
    let eve_input: bool = rng.r#gen();
    let (your_answer, eve_answer) = strategy.play(your_input, eve_input)?;
    let parity = your_answer != eve_answer;
    Ok(parity == (your_input && eve_input))
}

/// Fraction of `n_games` games won by `strategy`, with thread-local inputs.
pub fn estimate_win_probability<S>(strategy: &S, n_games: usize) -> ProtocolResult<f64>
where
    S: ChshStrategy + ?Sized,
{
    estimate_win_probability_with_rng(strategy, n_games, &mut rand::thread_rng())
}

/// Like [`estimate_win_probability`], drawing inputs from `rng`.
pub fn estimate_win_probability_with_rng<S, R>(
    strategy: &S,
    n_games: usize,
    rng: &mut R,
) -> ProtocolResult<f64>
where
    S: ChshStrategy + ?Sized,
    R: Rng + ?Sized,
{
    if n_games == 0 {
        return Err(ProtocolError::NoGames);
    }
    let mut wins = 0_usize;
    for _ in 0..n_games {
        if referee(strategy, rng)? {
            wins += 1;
        }
    }
    let probability = wins as f64 / n_games as f64;
    info!(n_games, wins, probability, "estimated chsh win probability");
    Ok(probability)
}
