use bugreport::{
    bugreport,
    collector::{CompileTimeInformation, EnvironmentVariables, OperatingSystem, SoftwareVersion},
    format::Markdown,
};

pub fn run() {
    bugreport!()
        .info(SoftwareVersion::default())
        .info(OperatingSystem::default())
        .info(EnvironmentVariables::list(&[
            "SHELL",
            "TERM",
            "PHOTOSTORE_REGION",
            "PHOTOSTORE_BUCKET",
            "PHOTOSTORE_API_ROOT",
        ]))
        .info(CompileTimeInformation::default())
        .print::<Markdown>();
}
