//! Receiver-side FEC recoverer: buffers source and repair symbols and
//! reconstructs lost payloads once enough repairs are available.

use log::{debug, warn};

use crate::config::FecConfig;
use crate::error::FecError;

use super::coeffs::gen_coeffs;
use super::solver::{recover_missing, SolveError};
use super::symbol::{RepairSymbol, Slot, SourceSymbol};

/// Buffers received symbols and performs recovery per spec.md §4.7.
pub struct FecRecoverer {
    config: FecConfig,
    source_symbols_start: u64,
    source_symbols: Vec<Slot>,
    repair_symbols: Vec<RepairSymbol>,
}

impl FecRecoverer {
    pub fn new(config: FecConfig) -> Self {
        Self {
            source_symbols: Vec::with_capacity(2 * config.ew_size as usize),
            config,
            source_symbols_start: 0,
            repair_symbols: Vec::new(),
        }
    }

    /// Adds a directly-received source symbol. Idempotent: re-adding the
    /// same packet number overwrites (not duplicates) the stored slot
    /// (spec.md P9, §9 Open Question resolution: assignment, not insert).
    pub fn add_source_symbol(&mut self, symbol: SourceSymbol) {
        if symbol.packet_number < self.source_symbols_start {
            return;
        }
        let pos = (symbol.packet_number - self.source_symbols_start) as usize;
        if self.source_symbols.len() < pos + 1 {
            self.source_symbols.resize(pos + 1, Slot::Empty);
        }
        self.clamp_window();
        // `clamp_window` may have advanced `source_symbols_start` and
        // drained the front of the buffer, so `pos` must be recomputed
        // against the post-clamp base rather than reused.
        if symbol.packet_number < self.source_symbols_start {
            return;
        }
        let pos = (symbol.packet_number - self.source_symbols_start) as usize;
        if pos < self.source_symbols.len() {
            self.source_symbols[pos] = Slot::Source(symbol);
        }
    }

    /// Adds a received repair symbol, applying the window-eviction rule
    /// (I2): a repair with a strictly greater `fss_esi`, or whose implied
    /// `source_start` has advanced, evicts all stored repair symbols and
    /// shifts the source window forward.
    pub fn add_repair_symbol(&mut self, symbol: RepairSymbol) {
        if symbol.nss == 0 || symbol.nss as usize > self.config.ew_size as usize {
            let err = FecError::MalformedRepairSymbol(format!(
                "nss={} outside (0, {}]",
                symbol.nss, self.config.ew_size
            ));
            warn!("dropping repair symbol: {err}");
            return;
        }
        let new_start = match symbol.fss_esi.checked_sub(symbol.nss as u64 - 1) {
            Some(v) => v,
            None => {
                let err = FecError::MalformedRepairSymbol(format!(
                    "fss_esi={} nss={} underflows",
                    symbol.fss_esi, symbol.nss
                ));
                warn!("dropping repair symbol: {err}");
                return;
            }
        };

        if let Some(first) = self.repair_symbols.first() {
            if symbol.fss_esi > first.fss_esi || new_start > self.source_symbols_start {
                self.repair_symbols.clear();
                let move_step = new_start - self.source_symbols_start;
                if (move_step as usize) < self.source_symbols.len() {
                    self.source_symbols.drain(0..move_step as usize);
                } else {
                    self.source_symbols.clear();
                }
                self.source_symbols_start = new_start;
            }
        }

        self.repair_symbols.push(symbol);
    }

    fn clamp_window(&mut self) {
        let cap = 2 * self.config.ew_size as usize;
        if self.source_symbols.len() > cap {
            let overflow = self.source_symbols.len() - cap;
            self.source_symbols.drain(0..overflow);
            self.source_symbols_start += overflow as u64;
        }
    }

    /// Attempts recovery of the current protected window. Returns the
    /// recovered source symbols, or `None` if nothing could be recovered
    /// (no repairs buffered, nothing missing, over-loss, or a singular
    /// system — spec.md P10).
    pub fn recover(&mut self) -> Option<Vec<SourceSymbol>> {
        let nss = self.repair_symbols.first()?.nss as usize;

        if self.source_symbols.len() < nss {
            self.source_symbols.resize(nss, Slot::Empty);
        }

        let missing: Vec<usize> = (0..nss)
            .filter(|&i| self.source_symbols[i].is_empty())
            .collect();
        let received: Vec<(usize, SourceSymbol)> = (0..nss)
            .filter_map(|i| {
                self.source_symbols[i]
                    .as_source()
                    .map(|s| (i, s.clone()))
            })
            .collect();

        if missing.is_empty() || missing.len() > self.repair_symbols.len() {
            return None;
        }

        let repair_symbols = &self.repair_symbols[..missing.len()];
        let repair_data: Vec<Vec<u8>> = repair_symbols.iter().map(|r| r.data.clone()).collect();
        let received_data: Vec<Vec<u8>> = received.iter().map(|(_, s)| s.data.clone()).collect();

        let mut received_coeffs = Vec::with_capacity(repair_symbols.len());
        let mut lost_coeffs = Vec::with_capacity(repair_symbols.len());
        for r in repair_symbols {
            let coeffs = gen_coeffs(r.repair_key, nss, self.config.fec_max_density);
            let recv_row: Vec<u8> = received.iter().map(|(i, _)| coeffs[*i]).collect();
            let lost_row: Vec<u8> = missing.iter().map(|&i| coeffs[i]).collect();
            received_coeffs.push(recv_row);
            lost_coeffs.push(lost_row);
        }

        match recover_missing(&repair_data, &received_data, &received_coeffs, &lost_coeffs) {
            Ok(recovered) => {
                let mut out = Vec::with_capacity(recovered.len());
                for (k, data) in recovered.into_iter().enumerate() {
                    let window_index = missing[k];
                    let symbol = SourceSymbol {
                        packet_number: window_index as u64 + self.source_symbols_start,
                        data,
                    };
                    self.source_symbols[window_index] = Slot::Source(symbol.clone());
                    out.push(symbol);
                }
                Some(out)
            }
            Err(SolveError::Singular) => {
                debug!("fec recoverer: system was singular, waiting for more rank");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(pn: u64, data: &[u8]) -> SourceSymbol {
        SourceSymbol {
            packet_number: pn,
            data: data.to_vec(),
        }
    }

    #[test]
    fn end_to_end_recovery_scenario() {
        // P1..P5, 100-byte payloads, repairs cover nss=5 fss_esi=4;
        // P2 and P4 are dropped and recovered via R1/R2.
        use crate::fec::linear::linear_combination;

        let payloads: Vec<Vec<u8>> = (1..=5).map(|i| vec![i as u8; 100]).collect();
        let refs: Vec<&[u8]> = payloads.iter().map(|v| v.as_slice()).collect();

        let repair_key1 = 0u8;
        let repair_key2 = 1u8;
        let coeffs1 = gen_coeffs(repair_key1, 5, 15);
        let coeffs2 = gen_coeffs(repair_key2, 5, 15);
        let r1_data = linear_combination(&refs, &coeffs1);
        let r2_data = linear_combination(&refs, &coeffs2);

        let mut recoverer = FecRecoverer::new(FecConfig::default());
        recoverer.add_source_symbol(src(0, &payloads[0]));
        recoverer.add_source_symbol(src(2, &payloads[2]));
        recoverer.add_source_symbol(src(4, &payloads[4]));
        recoverer.add_repair_symbol(RepairSymbol {
            fss_esi: 4,
            nss: 5,
            repair_key: repair_key1,
            data: r1_data,
        });
        recoverer.add_repair_symbol(RepairSymbol {
            fss_esi: 4,
            nss: 5,
            repair_key: repair_key2,
            data: r2_data,
        });

        let mut recovered = recoverer.recover().expect("recovery should succeed");
        recovered.sort_by_key(|s| s.packet_number);
        assert_eq!(recovered.len(), 2);
        assert_eq!(recovered[0].packet_number, 1);
        assert_eq!(recovered[0].data, payloads[1]);
        assert_eq!(recovered[1].packet_number, 3);
        assert_eq!(recovered[1].data, payloads[3]);
    }

    #[test]
    fn over_loss_gives_up_without_mutating_state() {
        let mut recoverer = FecRecoverer::new(FecConfig::default());
        recoverer.add_repair_symbol(RepairSymbol {
            fss_esi: 5,
            nss: 5,
            repair_key: 0,
            data: vec![0u8; 100],
        });
        // nothing received, only 1 repair symbol but 5 missing slots.
        assert!(recoverer.recover().is_none());
        assert_eq!(recoverer.repair_symbols.len(), 1);
    }

    #[test]
    fn window_eviction_on_advancing_repair() {
        let mut recoverer = FecRecoverer::new(FecConfig::default());
        recoverer.add_source_symbol(src(0, &[1]));
        recoverer.add_source_symbol(src(1, &[2]));
        recoverer.add_repair_symbol(RepairSymbol {
            fss_esi: 1,
            nss: 2,
            repair_key: 0,
            data: vec![0],
        });
        assert_eq!(recoverer.source_symbols_start, 0);

        // A repair with a strictly greater fss_esi evicts stored repairs
        // and shifts the source window (I2, P5).
        recoverer.add_repair_symbol(RepairSymbol {
            fss_esi: 3,
            nss: 2,
            repair_key: 1,
            data: vec![0],
        });
        assert_eq!(recoverer.repair_symbols.len(), 1);
        assert_eq!(recoverer.source_symbols_start, 2);
    }

    #[test]
    fn idempotent_source_add() {
        let mut recoverer = FecRecoverer::new(FecConfig::default());
        recoverer.add_source_symbol(src(0, &[1, 2, 3]));
        let len_before = recoverer.source_symbols.len();
        recoverer.add_source_symbol(src(0, &[9, 9, 9]));
        assert_eq!(recoverer.source_symbols.len(), len_before);
        assert_eq!(
            recoverer.source_symbols[0].as_source().unwrap().data,
            vec![9, 9, 9]
        );
    }

    #[test]
    fn source_add_survives_a_clamp_in_the_same_call() {
        // No repair symbol ever arrives to shift the window, so sources
        // keep piling up until `clamp_window` drains the front. The
        // packet number that triggers the clamp must still land at the
        // right slot under the new `source_symbols_start`, not be
        // silently dropped.
        let cfg = FecConfig::default(); // ew_size=5, cap=10
        let mut recoverer = FecRecoverer::new(cfg);
        for pn in 0..10u64 {
            recoverer.add_source_symbol(src(pn, &[pn as u8]));
        }
        assert_eq!(recoverer.source_symbols.len(), 10);
        assert_eq!(recoverer.source_symbols_start, 0);

        // This push grows the buffer to 11 slots, forcing clamp_window to
        // drain 1 and advance source_symbols_start to 1.
        recoverer.add_source_symbol(src(10, &[10]));
        assert_eq!(recoverer.source_symbols_start, 1);
        assert_eq!(recoverer.source_symbols.len(), 10);
        let last = recoverer.source_symbols.last().unwrap().as_source().unwrap();
        assert_eq!(last.packet_number, 10);
        assert_eq!(last.data, vec![10]);
    }
}
