//! OpenCV, built from a shallow clone of the release tag.

use crate::core::options::{DefaultValue, OptionSpec};
use crate::core::package_info::CppInfo;
use crate::core::settings::Os;
use crate::core::translate::VarMapping;
use crate::recipes::recipe::{PackageType, Recipe, RecipeContext, RecipeMetadata};

const METADATA: RecipeMetadata = RecipeMetadata {
    name: "opencv",
    user: "apexturbine",
    channel: "stable",
    package_type: PackageType::Library,
    url: "https://github.com/opencv/opencv.git",
    description: "Image and vision processing library",
    topics: &["opencv", "image", "vision", "processing"],
};

const CPU_BASELINES: &[&str] = &[
    "", "SSE", "SSE2", "SSE3", "SSSE3", "SSE41", "SSE42", "AVX", "AVX2", "AVX512",
];

const QT_VERSIONS: &[&str] = &["OFF", "5", "6"];

// Native backends are on by default on the platform that has them.
const ON_LINUX: &[(Os, DefaultValue)] = &[(Os::Linux, DefaultValue::Bool(true))];
const ON_WINDOWS: &[(Os, DefaultValue)] = &[(Os::Windows, DefaultValue::Bool(true))];

static OPTIONS: &[OptionSpec] = &[
    OptionSpec::boolean("shared", true),
    OptionSpec::boolean("pic", true),
    OptionSpec::choice("cpu_baseline", CPU_BASELINES, "AVX2"),
    OptionSpec::boolean("intrinsics", true),
    OptionSpec::boolean("optimization", true),
    OptionSpec::boolean("ipp_gaussian_blur", true),
    OptionSpec::boolean("ipp_mean", true),
    OptionSpec::boolean("ipp_minmax", true),
    OptionSpec::boolean("ipp_sum", true),
    OptionSpec::boolean("with_cuda", false),
    OptionSpec::boolean("with_opencl", true),
    OptionSpec::boolean("with_png", true),
    OptionSpec::boolean("with_jpeg", true),
    OptionSpec::boolean("with_tiff", true),
    OptionSpec::boolean("with_webp", true),
    OptionSpec::boolean("with_openjpeg", true),
    OptionSpec::boolean("with_jasper", true),
    OptionSpec::boolean("with_openexr", true),
    OptionSpec::boolean("with_ffmpeg", true),
    OptionSpec::boolean("with_gdal", false),
    OptionSpec::boolean("with_gdcm", false),
    OptionSpec::boolean("with_gstreamer", true),
    OptionSpec::boolean("with_i394", true),
    OptionSpec::boolean("with_openni2", false),
    OptionSpec::boolean("with_pvapi", false),
    OptionSpec::boolean("with_aravis", false),
    OptionSpec::boolean("with_ximea", false),
    OptionSpec::boolean("with_xine", false),
    OptionSpec::boolean("with_liberalsense", false),
    OptionSpec::boolean("with_mfx", false),
    OptionSpec::boolean("with_gphoto2", false),
    OptionSpec::boolean("videoio_enable_plugins", true),
    OptionSpec::any("videoio_plugins", "all"),
    OptionSpec::boolean("with_tbb", false),
    OptionSpec::boolean("with_openmp", false),
    OptionSpec::boolean("with_hpx", false),
    OptionSpec::choice("with_qt", QT_VERSIONS, "6"),
    OptionSpec::boolean("with_opengl", true),
    OptionSpec::boolean("with_protobuf", true),
    OptionSpec::boolean("build_protobuf", true),
    OptionSpec::boolean("dnn_opencl", true),
    OptionSpec::boolean("with_openvino", false),
    OptionSpec::boolean("dnn_cuda", false),
    OptionSpec::boolean("with_halide", false),
    OptionSpec::boolean("with_vulkan", false),
    OptionSpec::boolean("with_gtk", false)
        .only_on(Os::Linux)
        .with_os_defaults(ON_LINUX),
    OptionSpec::boolean("with_v4l", false)
        .only_on(Os::Linux)
        .with_os_defaults(ON_LINUX),
    OptionSpec::boolean("with_msmf", false)
        .only_on(Os::Windows)
        .with_os_defaults(ON_WINDOWS),
    OptionSpec::boolean("with_dshow", false)
        .only_on(Os::Windows)
        .with_os_defaults(ON_WINDOWS),
    OptionSpec::boolean("with_win32ui", false)
        .only_on(Os::Windows)
        .with_os_defaults(ON_WINDOWS),
];

static VARIABLES: &[VarMapping] = &[
    VarMapping::flag("BUILD_SHARED_LIBS", "shared"),
    VarMapping::flag("ENABLE_PIC", "pic"),
    VarMapping::constant("BUILD_TESTS", "OFF"),
    VarMapping::constant("BUILD_PERF_TESTS", "OFF"),
    VarMapping::constant("BUILD_EXAMPLES", "OFF"),
    VarMapping::constant("BUILD_opencv_apps", "OFF"),
    VarMapping::passthrough("CPU_BASELINE", "cpu_baseline"),
    VarMapping::flag("CV_ENABLE_INTRINSICS", "intrinsics"),
    VarMapping::inverted("CV_DISABLE_OPTIMIZATION", "optimization"),
    VarMapping::flag("WITH_IPP_GAUSSIAN_BLUR", "ipp_gaussian_blur"),
    VarMapping::flag("WITH_IPP_MEAN", "ipp_mean"),
    VarMapping::flag("WITH_IPP_MINMAX", "ipp_minmax"),
    VarMapping::flag("WITH_IPP_SUM", "ipp_sum"),
    VarMapping::flag("WITH_CUDA", "with_cuda"),
    VarMapping::flag("WITH_OPENCL", "with_opencl"),
    VarMapping::flag("WITH_PNG", "with_png"),
    VarMapping::flag("WITH_JPEG", "with_jpeg"),
    VarMapping::flag("WITH_TIFF", "with_tiff"),
    VarMapping::flag("WITH_WEBP", "with_webp"),
    VarMapping::flag("WITH_OPENJPEG", "with_openjpeg"),
    VarMapping::flag("WITH_JASPER", "with_jasper"),
    VarMapping::flag("WITH_OPENEXR", "with_openexr"),
    VarMapping::flag("WITH_FFMPEG", "with_ffmpeg"),
    VarMapping::flag("WITH_GDAL", "with_gdal"),
    VarMapping::flag("WITH_GDCM", "with_gdcm"),
    VarMapping::flag("WITH_GSTREAMER", "with_gstreamer"),
    VarMapping::flag("WITH_I394", "with_i394"),
    VarMapping::flag("WITH_OPENNI2", "with_openni2"),
    VarMapping::flag("WITH_PVAPI", "with_pvapi"),
    VarMapping::flag("WITH_ARAVIS", "with_aravis"),
    VarMapping::flag("WITH_XIMEA", "with_ximea"),
    VarMapping::flag("WITH_XINE", "with_xine"),
    VarMapping::flag("WITH_LIBERALSENSE", "with_liberalsense"),
    VarMapping::flag("WITH_MFX", "with_mfx"),
    VarMapping::flag("WITH_GPHOTO2", "with_gphoto2"),
    VarMapping::flag("VIDEOIO_ENABLE_PLUGINS", "videoio_enable_plugins"),
    VarMapping::passthrough("VIDEOIO_PLUGINS", "videoio_plugins"),
    VarMapping::flag("WITH_TBB", "with_tbb"),
    VarMapping::flag("WITH_OPENMP", "with_openmp"),
    VarMapping::flag("WITH_HPX", "with_hpx"),
    VarMapping::passthrough("WITH_QT", "with_qt"),
    VarMapping::flag("WITH_OPENGL", "with_opengl"),
    VarMapping::flag("WITH_PROTOBUF", "with_protobuf"),
    VarMapping::flag("BUILD_PROTOBUF", "build_protobuf"),
    VarMapping::flag("OPENCV_DNN_OPENCL", "dnn_opencl"),
    VarMapping::flag("WITH_OPENVINO", "with_openvino"),
    VarMapping::flag("OPENCV_DNN_CUDA", "dnn_cuda"),
    VarMapping::flag("WITH_HALIDE", "with_halide"),
    VarMapping::flag("WITH_VULKAN", "with_vulkan"),
    VarMapping::flag("WITH_GTK", "with_gtk").only_on(Os::Linux),
    VarMapping::flag("WITH_V4L", "with_v4l").only_on(Os::Linux),
    VarMapping::flag("WITH_MSMF", "with_msmf").only_on(Os::Windows),
    VarMapping::flag("WITH_DSHOW", "with_dshow").only_on(Os::Windows),
    VarMapping::flag("WITH_WIN32UI", "with_win32ui").only_on(Os::Windows),
    VarMapping::constant("MIN_VER_CMAKE", "3.19"),
];

/// The OpenCV recipe.
pub struct OpenCv;

impl Recipe for OpenCv {
    fn metadata(&self) -> &RecipeMetadata {
        &METADATA
    }

    fn option_specs(&self) -> &'static [OptionSpec] {
        OPTIONS
    }

    fn var_mappings(&self) -> &'static [VarMapping] {
        VARIABLES
    }

    fn folders(&self) -> (&'static str, &'static str) {
        ("opencv", "build")
    }

    fn configure_args(&self) -> &'static [&'static str] {
        &["-DCMAKE_POLICY_DEFAULT_CMP0074=NEW"]
    }

    fn package_info(&self, _ctx: &RecipeContext<'_>) -> CppInfo {
        let mut info = CppInfo::standard();
        info.include_dirs = vec!["include".to_string(), "include/opencv2".to_string()];
        info.build_dirs = vec![".".to_string()];
        info.set_property("cmake_find_mode", "none");
        info
    }
}
