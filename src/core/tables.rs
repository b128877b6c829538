//! Built-in module tables.
//!
//! These are a last-resort fallback for modules without a readable
//! `juce_module_info` file. When a descriptor exists it is authoritative;
//! see [`crate::core::catalog::ModuleCatalog`].

/// Every module of the JUCE 3 tree, in the order modules are usually checked.
pub const KNOWN_MODULES: &[&str] = &[
    "juce_audio_basics",
    "juce_audio_devices",
    "juce_audio_formats",
    "juce_audio_processors",
    "juce_audio_utils",
    "juce_box2d",
    "juce_core",
    "juce_cryptography",
    "juce_data_structures",
    "juce_events",
    "juce_graphics",
    "juce_gui_basics",
    "juce_gui_extra",
    "juce_opengl",
    "juce_video",
];

/// Framework tokens and the macOS framework each one names.
pub const FRAMEWORKS: &[(&str, &str)] = &[
    ("ACCELERATE", "Accelerate"),
    ("AUDIO_TOOLBOX", "AudioToolbox"),
    ("CORE_AUDIO", "CoreAudio"),
    ("CORE_MIDI", "CoreMIDI"),
    ("COCOA", "Cocoa"),
    ("CARBON", "Carbon"),
    ("DISC_RECORDING", "DiscRecording"),
    ("IO_KIT", "IOKit"),
    ("OPEN_GL", "OpenGL"),
    ("QT_KIT", "QTKit"),
    ("QUICK_TIME", "QuickTime"),
    ("QUARTZ_CORE", "QuartzCore"),
    ("WEB_KIT", "WebKit"),
];

/// Sibling modules a module requires.
pub fn dependencies_of(module: &str) -> &'static [&'static str] {
    match module {
        "juce_audio_basics" => &["juce_core"],
        "juce_audio_devices" => &["juce_audio_basics", "juce_audio_formats", "juce_events"],
        "juce_audio_formats" => &["juce_audio_basics"],
        "juce_audio_processors" => &["juce_audio_basics", "juce_gui_extra"],
        "juce_audio_utils" => &[
            "juce_gui_basics",
            "juce_audio_devices",
            "juce_audio_processors",
            "juce_audio_formats",
        ],
        "juce_box2d" => &["juce_graphics"],
        "juce_core" => &[],
        "juce_cryptography" => &["juce_core"],
        "juce_data_structures" => &["juce_core", "juce_events"],
        "juce_events" => &["juce_core"],
        "juce_graphics" => &["juce_core", "juce_events"],
        "juce_gui_basics" => &[
            "juce_core",
            "juce_events",
            "juce_graphics",
            "juce_data_structures",
        ],
        "juce_gui_extra" => &["juce_gui_basics"],
        "juce_opengl" => &["juce_gui_extra"],
        "juce_video" => &["juce_gui_extra"],
        _ => &[],
    }
}

/// macOS framework tokens a module links against.
pub fn frameworks_of(module: &str) -> &'static [&'static str] {
    match module {
        "juce_audio_basics" => &["ACCELERATE"],
        "juce_audio_devices" => &["CORE_AUDIO", "CORE_MIDI", "DISC_RECORDING"],
        "juce_audio_formats" => &["CORE_AUDIO", "CORE_MIDI", "QUARTZ_CORE", "AUDIO_TOOLBOX"],
        "juce_audio_processors" => &["CORE_AUDIO", "CORE_MIDI", "AUDIO_TOOLBOX"],
        "juce_core" => &["COCOA", "IO_KIT"],
        "juce_graphics" => &["COCOA", "QUARTZ_CORE"],
        "juce_gui_basics" => &["COCOA", "CARBON", "QUARTZ_CORE"],
        "juce_gui_extra" => &["WEB_KIT"],
        "juce_opengl" => &["OPEN_GL"],
        "juce_video" => &["QT_KIT", "QUICK_TIME"],
        _ => &[],
    }
}

/// Linux system libraries a module links against.
pub fn linux_libs_of(module: &str) -> &'static [&'static str] {
    match module {
        "juce_audio_devices" => &["asound"],
        "juce_core" => &["rt", "dl", "pthread"],
        "juce_graphics" => &["X11", "Xext", "freetype"],
        "juce_gui_basics" => &["X11", "Xinerama", "Xext"],
        "juce_opengl" => &["GL"],
        _ => &[],
    }
}

/// Look up the OS framework name for a token.
pub fn framework_name(token: &str) -> Option<&'static str> {
    FRAMEWORKS
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, name)| *name)
}
