//! The stub record.

use std::collections::BTreeSet;

use l1track_bend_encoding::ResolutionModel;
use l1track_config::Settings;
use l1track_errors::{ConfigurationError, GeometryError, Result, ValidationError};
use l1track_geometry::{DetectorLayer, ModuleCatalog, ModuleDescriptor, ModuleId, ModuleType};

use crate::digitization::{Digitization, DigitizationState, GpDigits, HtDigits, Kinematics, wrap_phi};
use crate::frontend::{self, FrontendDecision, FrontendInputs};
use crate::hough::HoughBinRange;
use crate::raw::RawStub;
use crate::truth::{
    ClusterKey, ClusterTruthAssociation, MatchPolicy, ParticleTranslation, StubKey,
    StubTruthAssociation, TpRef, TrueTrajectory, TruthAnnotation,
};

/// Module facts copied into each stub.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleInfo {
    /// Module identifier
    pub id: ModuleId,
    /// Barrel layer or endcap disk/ring
    pub layer: DetectorLayer,
    /// PS or 2S
    pub module_type: ModuleType,
    /// Minimum sensor-centre radius (cm)
    pub min_r: f32,
    /// Maximum sensor-centre radius (cm)
    pub max_r: f32,
    /// Minimum sensor-centre azimuth (rad)
    pub min_phi: f32,
    /// Maximum sensor-centre azimuth (rad)
    pub max_phi: f32,
    /// Minimum sensor-centre z (cm)
    pub min_z: f32,
    /// Maximum sensor-centre z (cm)
    pub max_z: f32,
    /// Strip pitch (cm)
    pub strip_pitch: f32,
    /// Strip length (cm)
    pub strip_length: f32,
    /// Sensor width (cm)
    pub sensor_width: f32,
    /// Number of strips
    pub n_strips: u32,
    /// Sensor separation (cm)
    pub sensor_spacing: f32,
    /// Resolution perpendicular to the strips (cm)
    pub sigma_perp: f32,
    /// Resolution along the strips (cm)
    pub sigma_par: f32,
}

impl ModuleInfo {
    fn from_descriptor(d: &ModuleDescriptor) -> Self {
        Self {
            id: d.id,
            layer: d.layer,
            module_type: d.module_type,
            min_r: d.min_r,
            max_r: d.max_r,
            min_phi: d.min_phi,
            max_phi: d.max_phi,
            min_z: d.min_z,
            max_z: d.max_z,
            strip_pitch: d.strip_pitch,
            strip_length: d.strip_length,
            sensor_width: d.sensor_width,
            n_strips: d.n_strips,
            sensor_spacing: d.sensor_spacing(),
            sigma_perp: d.sigma_perp(),
            sigma_par: d.sigma_par(),
        }
    }
}

/// A stub with all quantities the track finder needs.
///
/// Built once from a [`RawStub`] and its module. Position, bend, dφ, ρ and the
/// q/Pt bin range may afterwards be replaced by digitized values and restored
/// with [`reset_digitization`](Self::reset_digitization). Every other field is
/// fixed at construction.
///
/// Settings are not stored: each operation that needs them takes them as an
/// argument, and callers must pass the settings the stub was built with.
#[derive(Debug, Clone, PartialEq)]
pub struct Stub {
    index: usize,
    key: StubKey,
    module: ModuleInfo,
    layer_id: u32,
    layer_id_reduced: u8,
    r_err: f32,
    z_err: f32,
    local_u: [f32; 2],
    local_v: [f32; 2],
    cluster_keys: [ClusterKey; 2],
    iphi: u32,
    bend_in_frontend: f32,
    num_merged_bend: u32,
    bend_res: f32,
    bend_res_in_frontend: f32,
    pitch_over_sep: f32,
    dphi_over_bend: f32,
    frontend: FrontendDecision,
    coords: Digitization,
    truth: Option<TruthAnnotation>,
}

impl Stub {
    /// Build a stub, looking its module up in `catalog`.
    ///
    /// # Errors
    ///
    /// Returns `L1TrackError::Geometry` if the module is unknown, and
    /// otherwise the errors of [`Stub::new`].
    pub fn from_catalog<C, R>(
        raw: &RawStub,
        index: usize,
        catalog: &C,
        settings: &Settings,
        resolution: &R,
    ) -> Result<Self>
    where
        C: ModuleCatalog + ?Sized,
        R: ResolutionModel + ?Sized,
    {
        let module = catalog.module(raw.module)?;
        Self::new(raw, index, module, settings, resolution)
    }

    /// Build a stub from its raw measurement and module.
    ///
    /// # Errors
    ///
    /// - `L1TrackError::Configuration` if the stub lies outside the tracker
    ///   volume or the resolution model has no table for its layer or ring
    /// - `L1TrackError::DomainInvariant` if its layer has no reduced id
    /// - `L1TrackError::Geometry` if the module descriptor is invalid or its
    ///   sensors have no separation
    pub fn new<R>(
        raw: &RawStub,
        index: usize,
        module: &ModuleDescriptor,
        settings: &Settings,
        resolution: &R,
    ) -> Result<Self>
    where
        R: ResolutionModel + ?Sized,
    {
        module.validate()?;
        let (phi, r, z) = (raw.phi, raw.r, raw.z);
        if !settings.tracker.contains(r, z) {
            return Err(ConfigurationError::OutsideTrackerVolume { r, z }.into());
        }

        let module = ModuleInfo::from_descriptor(module);
        let barrel = module.layer.is_barrel();
        let layer_id = module.layer.encoded_id();
        let layer_id_reduced = module.layer.reduced_id()?;

        let (r_err, z_err) = if barrel {
            (0.0, 0.5 * module.strip_length)
        } else {
            (0.5 * module.strip_length, 0.0)
        };

        let mut bend = raw.trigger_bend;
        if !barrel && z > 0.0 {
            bend = -bend;
        }
        let bend_in_frontend = bend;

        let degraded = resolution.degrade(bend, &module.layer)?;
        let num_merged_bend = if settings.stub_cuts.bend_res_reduced {
            bend = degraded.bend;
            degraded.merged
        } else {
            1
        };

        let spacing = module.sensor_spacing;
        if !(spacing > 0.0) {
            return Err(GeometryError::invalid(
                module.id.0,
                "sensor_spacing",
                format!("must be positive, got {spacing}"),
            )
            .into());
        }
        let pitch_over_sep = module.strip_pitch / spacing;
        let delta_r = if barrel { spacing } else { spacing * r / z.abs() };
        let dphi_over_bend = module.strip_pitch / delta_r;
        let dphi = bend * dphi_over_bend;

        let bend_res = settings.bend_res(num_merged_bend);
        let bend_res_in_frontend = settings.bend_res_in_frontend();
        let q_over_pt_over_bend = dphi_over_bend / (r * settings.inv_pt_to_dphi());

        let frontend = frontend::evaluate(
            settings,
            &FrontendInputs {
                eta: (z / r).asinh(),
                bend_in_frontend,
                bend_res_in_frontend,
                bend,
                bend_res,
                q_over_pt_over_bend,
                bend_out_of_window: degraded.out_of_window,
            },
        );

        let bin_range = HoughBinRange::compute(settings, q_over_pt_over_bend, bend, bend_res);
        let original = Kinematics {
            phi,
            r,
            z,
            bend,
            dphi,
            rho: r - settings.phi_sectors.chosen_r_of_phi,
            bin_range,
        };

        let [c0, c1] = raw.clusters;
        Ok(Self {
            index,
            key: raw.key,
            module,
            layer_id,
            layer_id_reduced,
            r_err,
            z_err,
            local_u: [c0.local_u, c1.local_u],
            local_v: [c0.local_v, c1.local_v],
            cluster_keys: raw.cluster_keys(),
            iphi: strip_index(c0.local_u, module.n_strips),
            bend_in_frontend,
            num_merged_bend,
            bend_res,
            bend_res_in_frontend,
            pitch_over_sep,
            dphi_over_bend,
            frontend,
            coords: Digitization::new(original, dphi_over_bend, bend_res),
            truth: None,
        })
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    // Identity

    /// Position in the owning collection.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Handle in the upstream event data.
    pub fn key(&self) -> StubKey {
        self.key
    }

    /// Module identifier.
    pub fn module_id(&self) -> ModuleId {
        self.module.id
    }

    /// Module facts.
    pub fn module(&self) -> &ModuleInfo {
        &self.module
    }

    /// Encoded layer id (1-6 barrel, 11-15 / 21-25 endcap).
    pub fn layer_id(&self) -> u32 {
        self.layer_id
    }

    /// Layer id in 1-7.
    pub fn layer_id_reduced(&self) -> u8 {
        self.layer_id_reduced
    }

    /// Module is in the barrel.
    pub fn barrel(&self) -> bool {
        self.module.layer.is_barrel()
    }

    /// Module is a PS module.
    pub fn ps_module(&self) -> bool {
        self.module.module_type == ModuleType::Ps
    }

    /// Endcap ring, 0 in the barrel.
    pub fn endcap_ring(&self) -> u32 {
        self.module.layer.endcap_ring()
    }

    // Position

    /// Azimuth (rad).
    pub fn phi(&self) -> f32 {
        self.coords.working().phi
    }

    /// Radius (cm).
    pub fn r(&self) -> f32 {
        self.coords.working().r
    }

    /// Longitudinal coordinate (cm).
    pub fn z(&self) -> f32 {
        self.coords.working().z
    }

    /// Radial uncertainty from the strip length, non-zero in the endcap.
    pub fn r_err(&self) -> f32 {
        self.r_err
    }

    /// Longitudinal uncertainty from the strip length, non-zero in the barrel.
    pub fn z_err(&self) -> f32 {
        self.z_err
    }

    /// Pseudorapidity.
    pub fn eta(&self) -> f32 {
        (self.z() / self.r()).asinh()
    }

    /// Polar angle (rad).
    pub fn theta(&self) -> f32 {
        self.r().atan2(self.z())
    }

    /// Local cluster coordinates across the strips, in strip units.
    pub fn local_u(&self) -> [f32; 2] {
        self.local_u
    }

    /// Local cluster coordinates along the strips.
    pub fn local_v(&self) -> [f32; 2] {
        self.local_v
    }

    /// Strip number of the inner cluster.
    pub fn iphi(&self) -> u32 {
        self.iphi
    }

    /// Resolution perpendicular to the strips (cm).
    pub fn sigma_perp(&self) -> f32 {
        self.module.sigma_perp
    }

    /// Resolution along the strips (cm).
    pub fn sigma_par(&self) -> f32 {
        self.module.sigma_par
    }

    // Bend

    /// Bend as measured in the front-end chip.
    pub fn bend_in_frontend(&self) -> f32 {
        self.bend_in_frontend
    }

    /// Working bend, degraded and possibly digitized.
    pub fn bend(&self) -> f32 {
        self.coords.working().bend
    }

    /// Raw bend values merged into the degraded one.
    pub fn num_merged_bend(&self) -> u32 {
        self.num_merged_bend
    }

    /// Bend resolution after degradation.
    pub fn bend_res(&self) -> f32 {
        self.bend_res
    }

    /// Bend resolution in the front-end chip.
    pub fn bend_res_in_frontend(&self) -> f32 {
        self.bend_res_in_frontend
    }

    /// Strip pitch over sensor separation.
    pub fn pitch_over_sep(&self) -> f32 {
        self.pitch_over_sep
    }

    /// dφ per unit bend.
    pub fn dphi_over_bend(&self) -> f32 {
        self.dphi_over_bend
    }

    /// Azimuthal deviation between the stub and the track at the beam line.
    pub fn dphi(&self) -> f32 {
        self.coords.working().dphi
    }

    /// Track φ at the beam line estimated from the stub.
    pub fn beta(&self) -> f32 {
        self.phi() + self.dphi()
    }

    /// ρ parameter of the Hough transform.
    pub fn rho(&self) -> f32 {
        self.coords.working().rho
    }

    /// q/Pt per unit bend at the working radius.
    pub fn q_over_pt_over_bend(&self, settings: &Settings) -> f32 {
        self.coords
            .working()
            .q_over_pt_over_bend(settings, self.dphi_over_bend)
    }

    /// q/Pt estimated from the bend.
    pub fn q_over_pt(&self, settings: &Settings) -> f32 {
        self.q_over_pt_over_bend(settings) * self.bend()
    }

    /// φ at which the track crosses radius `rad`, with its uncertainty from
    /// the radial stub uncertainty.
    pub fn trk_phi_at_r(&self, rad: f32) -> (f32, f32) {
        let (phi, dphi, r) = (self.phi(), self.dphi(), self.r());
        let trk_phi_1 = phi + dphi * (1.0 - rad / (r - self.r_err));
        let trk_phi_2 = phi + dphi * (1.0 - rad / (r + self.r_err));
        (0.5 * (trk_phi_1 + trk_phi_2), 0.5 * (trk_phi_1 - trk_phi_2).abs())
    }

    // Acceptance and Hough bins

    /// Transmitted by the front-end electronics.
    pub fn frontend_pass(&self) -> bool {
        self.frontend.pass
    }

    /// Rejected only because the bend was outside the encoding window.
    pub fn stub_failed_window(&self) -> bool {
        self.frontend.failed_window_only
    }

    /// Compatible q/Pt bins.
    pub fn bin_range(&self) -> HoughBinRange {
        self.coords.working().bin_range
    }

    /// Lowest compatible q/Pt bin.
    pub fn min_q_over_pt_bin(&self) -> u32 {
        self.bin_range().min_bin()
    }

    /// Highest compatible q/Pt bin.
    pub fn max_q_over_pt_bin(&self) -> u32 {
        self.bin_range().max_bin()
    }

    // Digitization

    /// Digitize for the geometric processor input of `sector`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` for an invalid sector.
    pub fn digitize_for_gp(&mut self, settings: &Settings, sector: u32) -> std::result::Result<(), ValidationError> {
        self.coords.digitize_for_gp(settings, sector)
    }

    /// Digitize for the Hough transform input of `sector`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` for an invalid sector.
    pub fn digitize_for_ht(&mut self, settings: &Settings, sector: u32) -> std::result::Result<(), ValidationError> {
        self.coords.digitize_for_ht(settings, sector)
    }

    /// Restore all undigitized values.
    pub fn reset_digitization(&mut self) {
        self.coords.reset();
    }

    /// Current digitization state.
    pub fn digitization_state(&self) -> &DigitizationState {
        self.coords.state()
    }

    /// Holds GP-digitized values.
    pub fn digitized_for_gp(&self) -> bool {
        self.coords.state().is_digitized_for_gp()
    }

    /// Holds HT-digitized values.
    pub fn digitized_for_ht(&self) -> bool {
        self.coords.state().is_digitized_for_ht()
    }

    /// GP integer codes while digitized.
    pub fn gp_digits(&self) -> Option<&GpDigits> {
        self.coords.state().gp()
    }

    /// HT integer codes while digitized for the HT.
    pub fn ht_digits(&self) -> Option<&HtDigits> {
        self.coords.state().ht()
    }

    /// Values before any digitization.
    pub fn undigitized(&self) -> &Kinematics {
        self.coords.original()
    }

    /// Current values of every digitizable quantity.
    pub fn kinematics(&self) -> &Kinematics {
        self.coords.working()
    }

    // Truth

    /// Attach simulation truth. Only the first call has an effect.
    pub fn fill_truth<T, S, C>(
        &mut self,
        settings: &Settings,
        translation: &T,
        stub_truth: &S,
        cluster_truth: &C,
    ) where
        T: ParticleTranslation + ?Sized,
        S: StubTruthAssociation + ?Sized,
        C: ClusterTruthAssociation + ?Sized,
    {
        if self.truth.is_some() {
            return;
        }
        self.truth = Some(TruthAnnotation::annotate(
            self.key,
            self.cluster_keys,
            translation,
            stub_truth,
            cluster_truth,
            MatchPolicy::from_strict(settings.stub_cuts.stub_match_strict),
        ));
    }

    /// Truth annotation, if filled.
    pub fn truth(&self) -> Option<&TruthAnnotation> {
        self.truth.as_ref()
    }

    /// The single particle that produced both clusters.
    pub fn assoc_tp(&self) -> Option<TpRef> {
        self.truth.as_ref().and_then(TruthAnnotation::assoc_tp)
    }

    /// Associated particles under the configured match policy.
    pub fn assoc_tps(&self) -> BTreeSet<TpRef> {
        self.truth
            .as_ref()
            .map(|t| t.assoc_tps().clone())
            .unwrap_or_default()
    }

    /// Sole particle of each cluster.
    pub fn assoc_tp_of_cluster(&self) -> [Option<TpRef>; 2] {
        self.truth
            .as_ref()
            .map(TruthAnnotation::assoc_tp_of_cluster)
            .unwrap_or_default()
    }

    /// Produced by a single particle.
    pub fn genuine(&self) -> bool {
        self.assoc_tp().is_some()
    }

    /// The stub lies implausibly far in φ from the particle that produced it,
    /// typically because a delta ray made it. Fake stubs are never crazy.
    pub fn crazy_stub<O>(&self, settings: &Settings, trajectory: &O) -> bool
    where
        O: TrueTrajectory + ?Sized,
    {
        let Some(tp) = self.assoc_tp() else {
            return false;
        };
        trajectory
            .phi_at_stub(tp, self.r(), self.z())
            .is_some_and(|true_phi| {
                wrap_phi(self.phi() - true_phi).abs() > settings.stub_cuts.crazy_stub_cut
            })
    }
}

/// Strip number containing local coordinate `u`.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn strip_index(u: f32, n_strips: u32) -> u32 {
    if !(u > 0.0) {
        return 0;
    }
    (u.floor() as u32).min(n_strips.saturating_sub(1))
}
