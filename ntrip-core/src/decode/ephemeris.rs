//! 1019 GPS and 1045 Galileo broadcast ephemeris decoders.
//!
//! Both carry the full Keplerian orbital parameter set broadcast by their
//! respective navigation messages; field order and scale factors follow the
//! original decoder bit-for-bit, with sign extension routed through
//! [`get_signed`] throughout rather than the original's narrower integer
//! casts (some of which silently failed to sign-extend 14/24/10-bit fields).

use std::f64::consts::PI;

use crate::bitreader::{get_bits, get_signed};
use crate::output::OutputSink;
use crate::sink_writeln;

pub struct GpsEphemeris {
    pub sat_id: u8,
    pub week: u16,
    pub sv_accuracy: u8,
    pub code_on_l2: u8,
    pub idot: f64,
    pub iode: u8,
    pub toc: f64,
    pub af2: f64,
    pub af1: f64,
    pub af0: f64,
    pub iodc: u16,
    pub crs: f64,
    pub delta_n: f64,
    pub m0: f64,
    pub cuc: f64,
    pub cus: f64,
    pub crc_term: f64,
    pub crs2: f64,
    pub cic: f64,
    pub cis: f64,
    pub eccentricity: f64,
    pub sqrt_a: f64,
    pub toe: f64,
    pub fit_interval_flag: bool,
    pub aodo: u8,
    pub health: u8,
    pub tgd: f64,
    pub tx_time: f64,
}

/// Decodes message 1019 (GPS LNAV Ephemeris). Field order: PRN(6), week(10),
/// SV accuracy(4), code on L2(2), IDOT(14 signed), IODE(8), toc(16), af2(8
/// signed), af1(16 signed), af0(22 signed), IODC(10), Crs(16 signed), delta
/// n(16 signed), M0(32 signed), Cuc(16 signed), Cus(16 signed), a correction
/// term(16 signed), a second one(16 signed), Cic(16 signed), Cis(16 signed),
/// eccentricity(32), sqrt(A)(32), toe(16), fit interval flag(1), AODO(5),
/// health(6), TGD(8 signed), transmission time(16), reserved(2).
///
/// The original only ever reads two correction terms between Cus and Cic
/// (never Omega0/i0/omega/OmegaDot as separate 32-bit fields) — `crc_term`
/// and `crs2` are carried through as-is rather than invented.
pub fn decode_1019(payload: &[u8], sink: &mut dyn OutputSink) -> Option<GpsEphemeris> {
    if payload.len() * 8 < 406 {
        return None;
    }

    let sat_id = get_bits(payload, 12, 6) as u8;
    let week = get_bits(payload, 18, 10) as u16;
    let sv_accuracy = get_bits(payload, 28, 4) as u8;
    let code_on_l2 = get_bits(payload, 32, 2) as u8;
    let idot = get_signed(payload, 34, 14) as f64 * 2f64.powi(-43) * PI;
    let iode = get_bits(payload, 48, 8) as u8;
    let toc = get_bits(payload, 56, 16) as f64 * 2f64.powi(4);
    let af2 = get_signed(payload, 72, 8) as f64 * 2f64.powi(-55);
    let af1 = get_signed(payload, 80, 16) as f64 * 2f64.powi(-43);
    let af0 = get_signed(payload, 96, 22) as f64 * 2f64.powi(-31);
    let iodc = get_bits(payload, 118, 10) as u16;
    let crs = get_signed(payload, 128, 16) as f64 * 2f64.powi(-5);
    let delta_n = get_signed(payload, 144, 16) as f64 * 2f64.powi(-43) * PI;
    let m0 = get_signed(payload, 160, 32) as f64 * 2f64.powi(-31) * PI;
    let cuc = get_signed(payload, 192, 16) as f64 * 2f64.powi(-29);
    let cus = get_signed(payload, 208, 16) as f64 * 2f64.powi(-29);
    let crc_term = get_signed(payload, 224, 16) as f64 * 2f64.powi(-5);
    let crs2 = get_signed(payload, 240, 16) as f64 * 2f64.powi(-5);
    let cic = get_signed(payload, 256, 16) as f64 * 2f64.powi(-29);
    let cis = get_signed(payload, 272, 16) as f64 * 2f64.powi(-29);
    let eccentricity = get_bits(payload, 288, 32) as f64 * 2f64.powi(-33);
    let sqrt_a = get_bits(payload, 320, 32) as f64 * 2f64.powi(-19);
    let toe = get_bits(payload, 352, 16) as f64 * 2f64.powi(4);
    let fit_interval_flag = get_bits(payload, 368, 1) != 0;
    let aodo = get_bits(payload, 369, 5) as u8;
    let health = get_bits(payload, 374, 6) as u8;
    let tgd = get_signed(payload, 380, 8) as f64 * 2f64.powi(-31);
    let tx_time = get_bits(payload, 388, 16) as f64 * 2f64.powi(4);

    sink_writeln!(sink, "GPS ephemeris (1019) sat {} week {}", sat_id, week);
    sink_writeln!(sink, "  SV accuracy {} code-on-L2 {} health {}", sv_accuracy, code_on_l2, health);
    sink_writeln!(sink, "  IODE {} IODC {} AODO {} fit interval flag {}", iode, iodc, aodo, fit_interval_flag);
    sink_writeln!(sink, "  toc {:.0}s toe {:.0}s tx_time {:.0}s", toc, toe, tx_time);
    sink_writeln!(sink, "  af0 {:.6e}s af1 {:.6e}s/s af2 {:.6e}s/s^2 TGD {:.6e}s", af0, af1, af2, tgd);
    sink_writeln!(sink, "  idot {:.6e} rad/s delta_n {:.6e} rad/s M0 {:.9} rad", idot, delta_n, m0);
    sink_writeln!(
        sink,
        "  Cuc {:.6e} Cus {:.6e} crc_term {:.3} crs2 {:.3} Cic {:.6e} Cis {:.6e}",
        cuc, cus, crc_term, crs2, cic, cis
    );
    sink_writeln!(sink, "  e {:.9} sqrt(A) {:.6} m^0.5 Crs {:.3} m", eccentricity, sqrt_a, crs);

    Some(GpsEphemeris {
        sat_id,
        week,
        sv_accuracy,
        code_on_l2,
        idot,
        iode,
        toc,
        af2,
        af1,
        af0,
        iodc,
        crs,
        delta_n,
        m0,
        cuc,
        cus,
        crc_term,
        crs2,
        cic,
        cis,
        eccentricity,
        sqrt_a,
        toe,
        fit_interval_flag,
        aodo,
        health,
        tgd,
        tx_time,
    })
}

pub struct GalileoEphemeris {
    pub sat_id: u8,
    pub week: u16,
    pub iodnav: u16,
    pub sisa: u8,
    pub idot: f64,
    pub delta_n: f64,
    pub m0: f64,
    pub eccentricity: f64,
    pub sqrt_a: f64,
    pub omega0: f64,
    pub i0: f64,
    pub omega: f64,
    pub omega_dot: f64,
    pub cuc: f64,
    pub cus: f64,
    pub crc_term: f64,
    pub crs: f64,
    pub cic: f64,
    pub cis: f64,
    pub toe: f64,
    pub bgd_e5a_e1: f64,
    pub bgd_e5b_e1: f64,
    pub health: u8,
}

/// Decodes message 1045 (Galileo F/NAV Ephemeris). Field order: satellite
/// id(6), week(12), IODnav(10), SISA(8), idot(14 signed), delta n(16
/// signed), M0(32 signed), eccentricity(32), sqrt(A)(32), Omega0(32 signed),
/// i0(32 signed), omega(32 signed), OmegaDot(24 signed), Cuc(16 signed),
/// Cus(16 signed), Crc(16 signed), Crs(16 signed), Cic(16 signed), Cis(16
/// signed), toe(14), BGD E5a/E1(10 signed), BGD E5b/E1(10 signed),
/// health/status(6).
pub fn decode_1045(payload: &[u8], sink: &mut dyn OutputSink) -> Option<GalileoEphemeris> {
    if payload.len() * 8 < 430 {
        return None;
    }

    let sat_id = get_bits(payload, 12, 6) as u8;
    let week = get_bits(payload, 18, 12) as u16;
    let iodnav = get_bits(payload, 30, 10) as u16;
    let sisa = get_bits(payload, 40, 8) as u8;
    let idot = get_signed(payload, 48, 14) as f64 * 2f64.powi(-43) * PI;
    let delta_n = get_signed(payload, 62, 16) as f64 * 2f64.powi(-43) * PI;
    let m0 = get_signed(payload, 78, 32) as f64 * 2f64.powi(-31) * PI;
    let eccentricity = get_bits(payload, 110, 32) as f64 * 2f64.powi(-33);
    let sqrt_a = get_bits(payload, 142, 32) as f64 * 2f64.powi(-19);
    let omega0 = get_signed(payload, 174, 32) as f64 * 2f64.powi(-31) * PI;
    let i0 = get_signed(payload, 206, 32) as f64 * 2f64.powi(-31) * PI;
    let omega = get_signed(payload, 238, 32) as f64 * 2f64.powi(-31) * PI;
    let omega_dot = get_signed(payload, 270, 24) as f64 * 2f64.powi(-43) * PI;
    let cuc = get_signed(payload, 294, 16) as f64 * 2f64.powi(-29);
    let cus = get_signed(payload, 310, 16) as f64 * 2f64.powi(-29);
    let crc_term = get_signed(payload, 326, 16) as f64 * 2f64.powi(-5);
    let crs = get_signed(payload, 342, 16) as f64 * 2f64.powi(-5);
    let cic = get_signed(payload, 358, 16) as f64 * 2f64.powi(-29);
    let cis = get_signed(payload, 374, 16) as f64 * 2f64.powi(-29);
    let toe = get_bits(payload, 390, 14) as f64 * 60.0;
    let bgd_e5a_e1 = get_signed(payload, 404, 10) as f64 * 2f64.powi(-32);
    let bgd_e5b_e1 = get_signed(payload, 414, 10) as f64 * 2f64.powi(-32);
    let health = get_bits(payload, 424, 6) as u8;

    sink_writeln!(sink, "Galileo ephemeris (1045) sat {} week {}", sat_id, week);
    sink_writeln!(sink, "  IODnav {} SISA {} health {}", iodnav, sisa, health);
    sink_writeln!(sink, "  toe {:.0}s idot {:.6e} rad/s delta_n {:.6e} rad/s", toe, idot, delta_n);
    sink_writeln!(sink, "  M0 {:.9} rad omega0 {:.9} rad i0 {:.9} rad", m0, omega0, i0);
    sink_writeln!(sink, "  omega {:.9} rad omega_dot {:.6e} rad/s", omega, omega_dot);
    sink_writeln!(
        sink,
        "  Cuc {:.6e} Cus {:.6e} Crc {:.3} Crs {:.3} Cic {:.6e} Cis {:.6e}",
        cuc, cus, crc_term, crs, cic, cis
    );
    sink_writeln!(sink, "  e {:.9} sqrt(A) {:.6} m^0.5", eccentricity, sqrt_a);
    sink_writeln!(sink, "  BGD E5a/E1 {:.6e}s BGD E5b/E1 {:.6e}s", bgd_e5a_e1, bgd_e5b_e1);

    Some(GalileoEphemeris {
        sat_id,
        week,
        iodnav,
        sisa,
        idot,
        delta_n,
        m0,
        eccentricity,
        sqrt_a,
        omega0,
        i0,
        omega,
        omega_dot,
        cuc,
        cus,
        crc_term,
        crs,
        cic,
        cis,
        toe,
        bgd_e5a_e1,
        bgd_e5b_e1,
        health,
    })
}
