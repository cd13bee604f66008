use crate::config::{EqualizerConfig, EqualizerOptions, FilterLength};
use crate::error::{EqError, Result};
use crate::filter::{self, find_window, DesignContext, Synthesis, Workspace};
use crate::mapping::{find_tables, FrequencyTables, GainScale};
use std::sync::Arc;

/// Stereo channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    pub const BOTH: [Channel; 2] = [Channel::Left, Channel::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Left => 0,
            Channel::Right => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Channel {
        match self {
            Channel::Left => Channel::Right,
            Channel::Right => Channel::Left,
        }
    }
}

/// How the two kernels relate to the two curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    /// One kernel, designed from the given channel's curve and shared by both
    /// outputs.
    Linked(Channel),
    /// Each channel is designed from its own curve.
    Independent,
}

/// Kernels rewritten by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatedChannels {
    One(Channel),
    Both,
}

/// Graphic equalizer state: two editable curves, the kernels designed from
/// them, and the measured response of one of them.
pub struct Equalizer {
    //
    // Configuration and the tables derived from it.
    //
    filter_length: FilterLength,
    sample_rate: u32,
    normalized: bool,
    options: EqualizerOptions,
    tables: Arc<FrequencyTables>,
    scale: GainScale,
    window: Arc<[f64]>,

    //
    // Curves, in pixel space.
    //
    curves: [Vec<i16>; 2],
    actual_curve: Vec<i16>,

    //
    // Kernels and the scratch buffer; always the same length.
    //
    kernels: [Vec<f32>; 2],
    workspace: Workspace,

    mode: ChannelMode,
}

impl Equalizer {
    pub fn new(config: EqualizerConfig) -> Result<Self> {
        config.validate()?;

        let options = config.options;
        let tables = find_tables(options.visible_bin_count)?;
        let scale = GainScale::new(options.valid_y_range_height);
        let n = config.filter_length;

        log::info!(
            "Initializing equalizer: N={}, {} Hz, {} visible bins",
            n.get(),
            config.sample_rate,
            options.visible_bin_count
        );

        let zero = scale.zero_y();
        let bins = options.visible_bin_count;

        let mut eq = Self {
            filter_length: n,
            sample_rate: config.sample_rate,
            normalized: config.normalized,
            options,
            tables,
            scale,
            window: find_window(options.analysis_window, n),
            curves: [vec![zero; bins], vec![zero; bins]],
            actual_curve: vec![zero; bins],
            kernels: [vec![0.0; n.get()], vec![0.0; n.get()]],
            workspace: Workspace::new(n),
            mode: ChannelMode::Linked(Channel::Left),
        };
        eq.reset();
        Ok(eq)
    }

    /// Flattens every curve to 0 dB and rebuilds both kernels.
    pub fn reset(&mut self) {
        let zero = self.scale.zero_y();
        for curve in self.curves.iter_mut() {
            curve.fill(zero);
        }
        self.actual_curve.fill(zero);

        self.refresh_filters();
        self.update_actual_channel_curve(Channel::Left);
    }

    fn synthesize_channel(&mut self, channel: Channel) -> Synthesis {
        let Self {
            tables,
            scale,
            sample_rate,
            normalized,
            window,
            curves,
            kernels,
            workspace,
            ..
        } = self;

        let ctx = DesignContext {
            tables,
            scale: *scale,
            sample_rate: *sample_rate,
            normalized: *normalized,
            window,
        };
        let report = filter::synthesize(
            &curves[channel.index()],
            &mut kernels[channel.index()],
            &ctx,
            workspace,
        );
        log::debug!("{:?} kernel: {:?}", channel, report);
        report
    }

    /// Redesigns kernels after a curve edit.
    ///
    /// When linked, the linking channel's curve is designed once and copied to
    /// the other output; `channel` is ignored. When independent, `channel` is
    /// designed, and the other one too if `update_both` is set.
    pub fn update_filter(&mut self, channel: Channel, update_both: bool) -> UpdatedChannels {
        match self.mode {
            ChannelMode::Linked(source) => {
                self.synthesize_channel(source);
                self.copy_filter(source, source.other());
                UpdatedChannels::Both
            }
            ChannelMode::Independent => {
                self.synthesize_channel(channel);
                if update_both {
                    self.synthesize_channel(channel.other());
                    UpdatedChannels::Both
                } else {
                    UpdatedChannels::One(channel)
                }
            }
        }
    }

    fn refresh_filters(&mut self) {
        let channel = match self.mode {
            ChannelMode::Linked(source) => source,
            ChannelMode::Independent => Channel::Left,
        };
        self.update_filter(channel, true);
    }

    /// Copies one kernel over the other.
    pub fn copy_filter(&mut self, source: Channel, destination: Channel) {
        if source == destination {
            return;
        }
        let [left, right] = &mut self.kernels;
        match source {
            Channel::Left => right.copy_from_slice(left),
            Channel::Right => left.copy_from_slice(right),
        }
    }

    /// Shares `channel`'s kernel with both outputs from now on.
    pub fn link(&mut self, channel: Channel) {
        self.mode = ChannelMode::Linked(channel);
        self.copy_filter(channel, channel.other());
    }

    /// Gives each output its own kernel again. The channel that was not being
    /// edited (`current.other()`) gets redesigned from its own curve.
    pub fn unlink(&mut self, current: Channel) -> UpdatedChannels {
        self.mode = ChannelMode::Independent;
        self.update_filter(current.other(), false)
    }

    /// Measures `channel`'s kernel and stores it as the actual-response curve.
    /// Returns the peak magnitude.
    pub fn update_actual_channel_curve(&mut self, channel: Channel) -> f32 {
        let Self {
            tables,
            scale,
            sample_rate,
            normalized,
            window,
            kernels,
            workspace,
            actual_curve,
            ..
        } = self;

        let ctx = DesignContext {
            tables,
            scale: *scale,
            sample_rate: *sample_rate,
            normalized: *normalized,
            window,
        };
        filter::actual_response(&kernels[channel.index()], &ctx, workspace, actual_curve)
    }

    /// Replaces the filter length, reallocating kernels and scratch together,
    /// and redesigns both kernels.
    pub fn reconfigure(&mut self, filter_length: usize) -> Result<()> {
        let n = FilterLength::new(filter_length)?;
        if n == self.filter_length {
            return Ok(());
        }

        log::info!(
            "Reconfiguring filter length: {} -> {}",
            self.filter_length.get(),
            n.get()
        );

        self.filter_length = n;
        self.kernels = [vec![0.0; n.get()], vec![0.0; n.get()]];
        self.workspace = Workspace::new(n);
        self.window = find_window(self.options.analysis_window, n);
        self.refresh_filters();
        Ok(())
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) -> Result<()> {
        if sample_rate == 0 {
            return Err(EqError::InvalidSampleRate(sample_rate));
        }
        if sample_rate == self.sample_rate {
            return Ok(());
        }

        log::info!("Sample rate: {} -> {} Hz", self.sample_rate, sample_rate);

        self.sample_rate = sample_rate;
        let n = self.filter_length.get();
        self.kernels = [vec![0.0; n], vec![0.0; n]];
        self.refresh_filters();
        Ok(())
    }

    pub fn set_normalized(&mut self, normalized: bool) {
        if normalized != self.normalized {
            self.normalized = normalized;
            self.refresh_filters();
        }
    }

    //
    // Curve editing. None of these redesign the kernels; call
    // `update_filter` once the edit is complete.
    //

    fn check_bin(&self, bin: usize) -> Result<()> {
        let count = self.options.visible_bin_count;
        if bin >= count {
            return Err(EqError::BinOutOfRange { bin, count });
        }
        Ok(())
    }

    /// Sets one curve point from a raw pixel position.
    pub fn set_point(&mut self, channel: Channel, bin: usize, y: f32) -> Result<()> {
        self.check_bin(bin)?;
        self.curves[channel.index()][bin] = self.scale.clamp_y(y);
        Ok(())
    }

    /// Draws a straight stroke from `from` to `to`, `(bin, y)` each, filling
    /// the bins in between. `to.0` is clamped to the curve. Returns the point
    /// where the stroke ended, to continue the next segment from.
    pub fn draw_segment(
        &mut self,
        channel: Channel,
        from: (usize, f32),
        to: (usize, f32),
    ) -> Result<(usize, f32)> {
        self.check_bin(from.0)?;
        let last = self.options.visible_bin_count - 1;
        let (x0, y0) = (from.0 as isize, from.1);
        let mut x1 = to.0.min(last) as isize;
        let mut y1 = to.1;
        let scale = self.scale;
        let curve = &mut self.curves[channel.index()];

        let distance = (x1 - x0).abs();
        if distance > 1 {
            let delta = (y1 - y0) / distance as f32;
            let step = if x1 < x0 { -1 } else { 1 };
            let mut y = y0 + delta;
            let mut x = x0 + step;

            for _ in 1..distance {
                curve[x as usize] = scale.clamp_y(y);
                x += step;
                y += delta;
            }

            x1 = x;
            y1 = y;
        }

        curve[x1 as usize] = scale.clamp_y(y1);
        Ok((x1 as usize, y1))
    }

    /// Paints the whole zone containing `bin` at height `y`.
    pub fn change_zone_y(&mut self, channel: Channel, bin: usize, y: f32) {
        let zone = self.tables.visible_bin_to_zone_index(bin);
        let range = self.tables.zone_range(zone);
        let cy = self.scale.clamp_y(y);
        self.curves[channel.index()][range].fill(cy);
    }

    pub fn set_curve(&mut self, channel: Channel, values: &[i16]) -> Result<()> {
        let expected = self.options.visible_bin_count;
        if values.len() != expected {
            return Err(EqError::CurveLength {
                expected,
                actual: values.len(),
            });
        }

        let scale = self.scale;
        for (dst, &v) in self.curves[channel.index()].iter_mut().zip(values) {
            *dst = scale.clamp_y(v as f32);
        }
        Ok(())
    }

    /// Raw access for callers that write pixels themselves.
    pub fn curve_mut(&mut self, channel: Channel) -> &mut [i16] {
        &mut self.curves[channel.index()]
    }

    //
    // Accessors.
    //

    pub fn filter_length(&self) -> usize {
        self.filter_length.get()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn options(&self) -> &EqualizerOptions {
        &self.options
    }

    pub fn channel_mode(&self) -> ChannelMode {
        self.mode
    }

    pub fn kernel(&self, channel: Channel) -> &[f32] {
        &self.kernels[channel.index()]
    }

    pub fn curve(&self, channel: Channel) -> &[i16] {
        &self.curves[channel.index()]
    }

    pub fn actual_curve(&self) -> &[i16] {
        &self.actual_curve
    }

    /// Magnitude spectrum left by the last analysis.
    pub fn magnitudes(&self) -> &[f32] {
        self.workspace.magnitudes()
    }

    pub fn scale(&self) -> &GainScale {
        &self.scale
    }

    pub fn tables(&self) -> &FrequencyTables {
        &self.tables
    }

    pub fn visible_frequencies(&self) -> &[f32] {
        self.tables.visible_frequencies()
    }

    pub fn equivalent_zones_frequency_count(&self) -> &[usize] {
        self.tables.equivalent_zones_frequency_count()
    }

    pub fn zero_y(&self) -> i16 {
        self.scale.zero_y()
    }

    /// Peak of `channel`'s measured response, without touching the
    /// actual-response curve.
    pub fn measure_peak(&mut self, channel: Channel) -> f32 {
        filter::analyze(
            &self.kernels[channel.index()],
            &self.window,
            &mut self.workspace,
        )
    }
}
