#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Source-over for one premultiplied pixel, with an extra opacity applied to `src`.
pub(crate) fn premul_over_px(dst: [u8; 4], src: [u8; 4], opacity: f32) -> [u8; 4] {
    let o = (opacity.clamp(0.0, 1.0) * 255.0).round() as u16;
    let s = [
        mul_div255_u8(u16::from(src[0]), o),
        mul_div255_u8(u16::from(src[1]), o),
        mul_div255_u8(u16::from(src[2]), o),
        mul_div255_u8(u16::from(src[3]), o),
    ];
    let inv = 255 - u16::from(s[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let v = u16::from(s[i]) + u16::from(mul_div255_u8(u16::from(dst[i]), inv));
        out[i] = v.min(255) as u8;
    }
    out
}

/// HSV (all components in `[0, 1]`) to linear-ish RGB in `[0, 1]`.
pub(crate) fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0) * 6.0;
    let i = h.floor();
    let f = h - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match i as u32 % 6 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}
