//! Display modes and their rasterization payloads
//!
//! A mode is either the ambient idle cloud or one of the festive shape
//! formations. Each shaped mode carries a small ordered list of
//! `GlyphLine` instructions (text, pixel size, vertical anchor on the 1024px
//! canvas) plus the policies the target builder needs: scan stride,
//! depth multiplier, and whether the mode gets the extra horse wobble.

/// One line of the rasterization payload: text centered horizontally at
/// the given pixel size, with its vertical middle at `y_center` canvas
/// pixels from the top.
#[derive(Debug, Clone, Copy)]
pub struct GlyphLine {
    pub text: &'static str,
    pub px: f32,
    pub y_center: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Idle,
    NewYear,     // 新春快乐
    Horse,       // single hero glyph
    LuckyHorse,  // stacked glyph + caption
    RedEnvelope, // 红包拿来
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Idle,
        Mode::NewYear,
        Mode::Horse,
        Mode::LuckyHorse,
        Mode::RedEnvelope,
    ];

    /// Rasterization instructions; empty for `Idle`.
    pub fn payload(&self) -> &'static [GlyphLine] {
        match self {
            Mode::Idle => &[],
            Mode::NewYear => &[GlyphLine { text: "新春快乐", px: 150.0, y_center: 512.0 }],
            Mode::Horse => &[GlyphLine { text: "🐎", px: 480.0, y_center: 512.0 }],
            Mode::LuckyHorse => &[
                GlyphLine { text: "🐎", px: 380.0, y_center: 380.0 },
                GlyphLine { text: "年大吉", px: 130.0, y_center: 700.0 },
            ],
            Mode::RedEnvelope => &[GlyphLine { text: "红包拿来", px: 150.0, y_center: 512.0 }],
        }
    }

    /// Pixel stride for the ink scan. Horse modes are scanned denser so the
    /// glyph silhouette keeps its fidelity.
    pub fn scan_stride(&self) -> usize {
        if self.horse_themed() {
            3
        } else {
            4
        }
    }

    /// Depth spread multiplier for an ink point at world-space `y`.
    ///
    /// The stacked layout keys off the raw y sign: points above the canvas
    /// center belong to the hero glyph and get visible 3D thickness, the
    /// caption below stays flat. The threshold is deliberately the literal
    /// y > 0 rule, not a per-line assignment.
    pub fn depth_multiplier(&self, world_y: f32) -> f32 {
        match self {
            Mode::LuckyHorse => {
                if world_y > 0.0 {
                    5.0
                } else {
                    1.5
                }
            }
            Mode::Horse => 6.0,
            _ => 1.2,
        }
    }

    /// Horse modes get a small extra oscillation in the group rotation.
    pub fn horse_themed(&self) -> bool {
        matches!(self, Mode::Horse | Mode::LuckyHorse)
    }

    /// Display label used in prompts and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Idle => "NONE",
            Mode::NewYear => "新春快乐",
            Mode::Horse => "马",
            Mode::LuckyHorse => "马年大吉",
            Mode::RedEnvelope => "红包拿来",
        }
    }

    /// Static festive phrase shown when the remote service is unavailable.
    pub fn fallback_phrase(&self) -> &'static str {
        match self {
            Mode::Idle => "请展示手势来开启祝福...",
            Mode::NewYear => "祝您 2026 马年：新春快乐，万事如意！",
            Mode::Horse => "龙马精神，快马加鞭！",
            Mode::LuckyHorse => "马到成功，大吉大利！",
            Mode::RedEnvelope => "恭喜发财，红包拿来！🧧",
        }
    }

    /// Map a selector index (number keys) to a mode; anything out of range
    /// degrades to `Idle`.
    pub fn from_index(i: usize) -> Mode {
        Mode::ALL.get(i).copied().unwrap_or(Mode::Idle)
    }
}
