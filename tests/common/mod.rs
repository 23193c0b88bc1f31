#![allow(dead_code)]

use ws2811_bitbang::RGB8;

/// Small deterministic generator for test color data.
pub struct XorShift32(pub u32);

impl XorShift32 {
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    pub fn next_color(&mut self) -> RGB8 {
        let v = self.next_u32();
        RGB8::new(v as u8, (v >> 8) as u8, (v >> 16) as u8)
    }

    pub fn colors(&mut self, count: usize) -> Vec<RGB8> {
        (0..count).map(|_| self.next_color()).collect()
    }
}

/// (rise, fall) cycle pairs of one lane, in order.
pub fn pulses(edges: &[ws2811_bitbang::sim::Edge], lane: usize) -> Vec<(u64, u64)> {
    let mut out = Vec::new();
    let mut rise = None;
    for edge in edges.iter().filter(|e| usize::from(e.lane) == lane) {
        if edge.high {
            rise = Some(edge.cycle);
        } else if let Some(r) = rise.take() {
            out.push((r, edge.cycle));
        }
    }
    out
}
