use refguard_types::Domain;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

const MAX_DEPTH: usize = 3;

fn cues(domain: &Domain) -> &'static [&'static str] {
    match domain {
        Domain::Gaming => &["render", "shader", "opengl", "vulkan", "godot", "unity", "unreal", "fps"],
        Domain::Robotics => &["ros", "rclpy", "rospy", "navigation", "gazebo", "sensor", "urdf"],
        Domain::Hpc => &["blas", "openmp", "cuda", "cupy", "numba", "vectorize", "simd"],
        Domain::Medical => &["iec62304", "hl7", "dicom", "device", "patient", "audit", "compliance"],
        Domain::Satellite => &["telemetry", "attitude", "orbit", "aocs", "rtos", "stm32", "canbus", "flight"],
        Domain::Sustainability => &["climate", "weather", "meteorology", "sensor", "ingestion", "pipeline", "forecast"],
        Domain::SpeechTherapy => &["audio", "speech", "asr", "stt", "latency", "phoneme", "therapy"],
        Domain::Unknown(_) => &[],
    }
}

/// Guess a project's domain from directory and file names.
///
/// Entries up to three levels below `project_path` are visited in name order;
/// the first name containing a cue word decides, with domains tried in
/// [`Domain::KNOWN`] order. Only names below the root are inspected, so the
/// location of the project itself never influences the result.
pub fn detect_domain(project_path: &Path) -> Option<Domain> {
    let walker = WalkDir::new(project_path)
        .min_depth(1)
        .max_depth(MAX_DEPTH)
        .sort_by_file_name();

    for entry in walker.into_iter().filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().to_lowercase();
        for domain in Domain::KNOWN {
            if cues(&domain).iter().any(|cue| name.contains(cue)) {
                debug!(path = %entry.path().display(), domain = %domain, "domain cue found");
                return Some(domain);
            }
        }
    }
    None
}
