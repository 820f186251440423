use colored::Colorize;
use interface_model::model::*;
use interface_model::{load, validate};

/// A realistic slice of a head-unit mobile API, the kind of thing a parser
/// hands to the generators.
fn realistic_sample() -> Interface {
    Interface::new()
        .with_param("name", "MOBILE_API")
        .with_param("version", "2.0")
        .with_param("date", "2013-03-18")
        .with_enums([
            Enum::new("Result")
                .with_internal_scope("Result")
                .with_description(["Defines the possible result codes returned to the mobile application."])
                .with_elements([
                    EnumElement::new("SUCCESS").with_value(0),
                    EnumElement::new("INVALID_DATA").with_value(1),
                    EnumElement::new("UNSUPPORTED_REQUEST").with_value(2),
                    EnumElement::new("GENERIC_ERROR").with_value(22),
                ]),
            Enum::new("ButtonName").with_elements(
                ["OK", "SEEKLEFT", "SEEKRIGHT", "TUNEUP", "TUNEDOWN", "PRESET_0", "CUSTOM_BUTTON"]
                    .map(EnumElement::new),
            ),
            Enum::new("ButtonPressMode")
                .with_elements([
                    EnumElement::new("LONG").with_description(["A button was released after being held."]),
                    EnumElement::new("SHORT"),
                ]),
            Enum::new("Language")
                .with_issue(Issue::new("dev", "Only a subset of locales is supported by the HMI."))
                .with_elements([
                    EnumElement::new("EN-US").with_internal_name("EN_US"),
                    EnumElement::new("ES-MX").with_internal_name("ES_MX"),
                    EnumElement::new("FR-CA").with_internal_name("FR_CA"),
                ]),
        ])
        .with_structs([
            Struct::new("SyncMsgVersion")
                .with_description(["Specifies the version number of the protocol."])
                .with_members([
                    Param::new("majorVersion", Ty::integer_range(Some(1), Some(10))),
                    Param::new("minorVersion", Ty::integer_range(Some(0), Some(1000))),
                ]),
            Struct::new("TTSChunk").with_members([
                Param::new("text", Ty::string_max(500)),
                Param::new("type", Ty::string_max(64)).optional(),
            ]),
        ])
        .with_functions([
            Function::new("RegisterAppInterface", "RegisterAppInterfaceID", MessageType::Request)
                .with_design_description(["Must be the first request of a session."])
                .with_params([
                    FunctionParam::new("syncMsgVersion", Ty::struct_ref("SyncMsgVersion")),
                    FunctionParam::new("appName", Ty::string_max(100)),
                    FunctionParam::new("ttsName", Ty::array_sized(Ty::struct_ref("TTSChunk"), Some(1), Some(100)))
                        .optional(),
                    FunctionParam::new("isMediaApplication", Ty::Boolean).optional().with_default(false),
                    FunctionParam::new("languageDesired", Ty::EnumSubset(
                        EnumSubset::new("SupportedLanguage", "Language").with_allowed(["EN-US", "FR-CA"]),
                    )),
                ]),
            Function::new("RegisterAppInterface", "RegisterAppInterfaceID", MessageType::Response)
                .with_params([
                    FunctionParam::new("success", Ty::Boolean),
                    FunctionParam::new("resultCode", Ty::enum_ref("Result")),
                    FunctionParam::new("info", Ty::string_max(1000)).optional(),
                ]),
            Function::new("OnButtonPress", "OnButtonPressID", MessageType::Notification)
                .with_params([
                    FunctionParam::new("buttonName", Ty::enum_ref("ButtonName")),
                    FunctionParam::new("buttonPressMode", Ty::enum_ref("ButtonPressMode")),
                    FunctionParam::new("customButtonID", Ty::integer_range(Some(0), Some(65536)))
                        .optional()
                        .with_platform("android"),
                ]),
            Function::new("SetMediaClockTimer", "SetMediaClockTimerID", MessageType::Request)
                .with_todo("describe pause semantics")
                .with_params([
                    FunctionParam::new("volume", Ty::double_range(Some(0.0), Some(1.0))).with_default(0.5),
                    FunctionParam::new("updateMode", Ty::string()).with_default("COUNTUP"),
                ]),
        ])
}

/// The subset references an element the enum does not have. The model
/// accepts it; only the validation pass complains.
fn foreign_subset_sample() -> Interface {
    Interface::new()
        .with_enums([Enum::new("Letter").with_elements(["A", "B", "C"].map(EnumElement::new))])
        .with_functions([Function::new("Pick", "PickID", MessageType::Request).with_params([
            FunctionParam::new("letter", Ty::EnumSubset(EnumSubset::new("Some", "Letter").with_allowed(["A", "D"]))),
        ])])
}

fn run_case(name: &str, iface: &Interface, expected_violations: usize) -> anyhow::Result<bool> {
    let src = load::to_string_pretty(iface)?;
    let back = load::from_str(&src)?;
    let round_trip_ok = &back == iface;
    let violations = validate::validate_interface(&back);

    let ok = round_trip_ok && violations.len() == expected_violations;
    let mark = if ok { "✅".to_string() } else { "❌".to_string() };
    eprintln!(
        "{mark} {name}: {} enums, {} structs, {} functions, round-trip {}, {} violation(s)",
        back.enums.len(),
        back.structs.len(),
        back.functions.len(),
        if round_trip_ok { "ok".green() } else { "MISMATCH".red() },
        violations.len(),
    );
    for v in &violations {
        eprintln!("    {v}");
    }
    Ok(ok)
}

fn main() -> anyhow::Result<()> {
    let mut all_ok = true;
    all_ok &= run_case("realistic", &realistic_sample(), 0)?;
    all_ok &= run_case("foreign-subset", &foreign_subset_sample(), 1)?;
    if !all_ok {
        std::process::exit(1);
    }
    Ok(())
}
