//! Schema catalog construction
//!
//! Parses the loosely-XML schema document written alongside each recording
//! into a typed catalog of aircraft and message definitions. Construction is
//! strict: if the document cannot be parsed even after the tolerant cleanup
//! pre-pass, nothing is decodable and the build fails loudly. Individual
//! broken elements inside an otherwise parseable document are skipped with a
//! recoverable warning instead.

use std::collections::HashMap;

use roxmltree::{Document, Node};
use tracing::{debug, warn};

use super::xml_cleanup::clean_schema_text;
use crate::error::{Result, SchemaError};
use crate::types::{AircraftDefinition, FieldDefinition, FieldType, MessageDefinition};

/// The message class transmitted during flight, as opposed to ground-station
/// command sets that share the same schema file.
pub const TELEMETRY_CLASS: &str = "telemetry";

/// Typed catalog of everything a schema file declares.
///
/// One catalog is built per schema file and is read-only afterwards; every
/// decode of records belonging to these aircraft shares it by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaCatalog {
    aircraft: Vec<AircraftDefinition>,
    /// Raw class-name to message-map table used to resolve message lookups.
    classes: HashMap<String, HashMap<String, MessageDefinition>>,
}

impl SchemaCatalog {
    /// Build a catalog from schema text.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::Malformed`] when the document cannot be parsed as
    ///   structured markup even after cleanup.
    /// - [`SchemaError::MissingTelemetryClass`] when the schema declares
    ///   aircraft but no `telemetry` message class exists at all.
    pub fn build(schema_text: &str) -> Result<Self> {
        let cleaned = clean_schema_text(schema_text);
        let doc = Document::parse(&cleaned)?;

        let mut aircraft = Vec::new();
        for node in doc.descendants().filter(|n| n.has_tag_name("aircraft")) {
            if let Some(entry) = parse_aircraft(&node) {
                aircraft.push(entry);
            }
        }

        let mut classes: HashMap<String, HashMap<String, MessageDefinition>> = HashMap::new();
        for node in doc.descendants().filter(|n| n.has_tag_name("msg_class")) {
            let class_name = node.attribute("NAME").unwrap_or("unknown").to_string();
            let mut messages = HashMap::new();
            for message_node in node.children().filter(|n| n.has_tag_name("message")) {
                if let Some(message) = parse_message(&message_node) {
                    messages.insert(message.name.clone(), message);
                }
            }
            classes.insert(class_name, messages);
        }

        // Every aircraft resolves its message map against the telemetry class
        // up front; decode never performs lazy schema lookups.
        match classes.get(TELEMETRY_CLASS) {
            Some(telemetry) => {
                for entry in &mut aircraft {
                    entry.messages = telemetry.clone();
                }
            }
            None if !aircraft.is_empty() => {
                return Err(SchemaError::MissingTelemetryClass);
            }
            None => {}
        }

        debug!(
            aircraft_count = aircraft.len(),
            class_count = classes.len(),
            "schema catalog built"
        );

        Ok(SchemaCatalog { aircraft, classes })
    }

    /// All aircraft entries in schema order.
    pub fn aircraft(&self) -> &[AircraftDefinition] {
        &self.aircraft
    }

    /// Look up an aircraft by id. Linear scan; catalogs hold tens of entries.
    pub fn aircraft_by_id(&self, ac_id: u32) -> Option<&AircraftDefinition> {
        self.aircraft.iter().find(|a| a.ac_id == ac_id)
    }

    /// Look up a message definition within an aircraft by name.
    pub fn message(&self, ac_id: u32, message_name: &str) -> Option<&MessageDefinition> {
        self.aircraft_by_id(ac_id)?.message(message_name)
    }

    /// Look up a message definition within an aircraft by numeric id.
    pub fn message_by_id(&self, ac_id: u32, message_id: u32) -> Option<&MessageDefinition> {
        self.aircraft_by_id(ac_id)?.message_by_id(message_id)
    }

    /// The raw message map for a named class, if declared.
    pub fn message_class(&self, name: &str) -> Option<&HashMap<String, MessageDefinition>> {
        self.classes.get(name)
    }
}

fn parse_aircraft(node: &Node) -> Option<AircraftDefinition> {
    // An element with no id attribute at all cannot be addressed by any
    // record and is skipped; an unparseable id still keeps the entry under
    // id 0 so its metadata survives.
    let Some(raw_id) = node.attribute("ac_id") else {
        warn!("aircraft element without ac_id attribute, skipping");
        return None;
    };
    let ac_id = raw_id.trim().parse().unwrap_or_else(|_| {
        warn!(raw_id, "unparseable aircraft id, defaulting to 0");
        0
    });

    Some(AircraftDefinition {
        ac_id,
        name: node.attribute("name").unwrap_or("Unknown").to_string(),
        airframe: node.attribute("airframe").unwrap_or_default().to_string(),
        messages: HashMap::new(), // resolved after message classes are parsed
    })
}

fn parse_message(node: &Node) -> Option<MessageDefinition> {
    let name = node.attribute("NAME").unwrap_or_default().to_string();
    if name.is_empty() {
        warn!("message element without NAME attribute, skipping");
        return None;
    }
    let message_id = node
        .attribute("ID")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);

    let description = node
        .children()
        .find(|n| n.has_tag_name("description"))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string());

    let fields = node
        .children()
        .filter(|n| n.has_tag_name("field"))
        .filter_map(|n| parse_field(&n))
        .collect();

    Some(MessageDefinition { name, message_id, fields, description })
}

fn parse_field(node: &Node) -> Option<FieldDefinition> {
    let name = node.attribute("NAME").unwrap_or_default().to_string();
    if name.is_empty() {
        warn!("field element without NAME attribute, skipping");
        return None;
    }
    let type_tag = node.attribute("TYPE").unwrap_or_default().to_string();
    let field_type = FieldType::parse(&type_tag);
    if field_type.is_none() {
        warn!(field = %name, tag = %type_tag, "unrecognized field type tag");
    }

    let alt_unit_coef = node.attribute("ALT_UNIT_COEF").and_then(|v| v.trim().parse().ok());
    let values = node
        .attribute("VALUES")
        .map(|v| v.split('|').map(|s| s.trim().to_string()).collect());

    Some(FieldDefinition {
        name,
        type_tag,
        field_type,
        unit: node.attribute("UNIT").map(str::to_string),
        alt_unit: node.attribute("ALT_UNIT").map(str::to_string),
        alt_unit_coef,
        description: node.text().map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarType;

    const SCHEMA: &str = r#"
        <configuration>
          <conf>
            <aircraft ac_id="3" name="Bixler" airframe="fixedwing"/>
            <aircraft ac_id="7" name="Quad" airframe="rotorcraft"/>
          </conf>
          <protocol>
            <msg_class NAME="telemetry">
              <message NAME="GPS" ID="8">
                <description>Position fix</description>
                <field NAME="lat" TYPE="float" UNIT="deg"/>
                <field NAME="lon" TYPE="float" UNIT="deg"/>
                <field NAME="alt" TYPE="int16" UNIT="m" ALT_UNIT="ft" ALT_UNIT_COEF="3.28084"/>
              </message>
              <message NAME="STATUS" ID="12">
                <field NAME="mode" TYPE="uint8" VALUES="MANUAL|AUTO1|AUTO2">current mode</field>
              </message>
            </msg_class>
            <msg_class NAME="ground">
              <message NAME="SETTING" ID="1">
                <field NAME="index" TYPE="uint8"/>
              </message>
            </msg_class>
          </protocol>
        </configuration>
    "#;

    #[test]
    fn builds_catalog_with_telemetry_messages() {
        let catalog = SchemaCatalog::build(SCHEMA).unwrap();
        assert_eq!(catalog.aircraft().len(), 2);

        let bixler = catalog.aircraft_by_id(3).unwrap();
        assert_eq!(bixler.name, "Bixler");
        assert_eq!(bixler.airframe, "fixedwing");
        // Only the telemetry class lands in the aircraft message map.
        assert_eq!(bixler.messages.len(), 2);
        assert!(bixler.message("SETTING").is_none());

        let gps = catalog.message(3, "GPS").unwrap();
        assert_eq!(gps.message_id, 8);
        assert_eq!(gps.description.as_deref(), Some("Position fix"));
        assert_eq!(gps.fields.len(), 3);
        assert_eq!(gps.fields[0].name, "lat");
        assert_eq!(gps.fields[2].field_type, Some(FieldType::Scalar(ScalarType::Int16)));
        assert_eq!(gps.fields[2].alt_unit_coef, Some(3.28084));
    }

    #[test]
    fn field_order_is_declaration_order() {
        let catalog = SchemaCatalog::build(SCHEMA).unwrap();
        let gps = catalog.message(3, "GPS").unwrap();
        let names: Vec<&str> = gps.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["lat", "lon", "alt"]);
    }

    #[test]
    fn parses_enum_values_in_order() {
        let catalog = SchemaCatalog::build(SCHEMA).unwrap();
        let status = catalog.message(7, "STATUS").unwrap();
        let mode = status.field("mode").unwrap();
        assert_eq!(
            mode.values.as_deref(),
            Some(&["MANUAL".to_string(), "AUTO1".to_string(), "AUTO2".to_string()][..])
        );
        assert_eq!(mode.description.as_deref(), Some("current mode"));
    }

    #[test]
    fn message_lookup_by_id() {
        let catalog = SchemaCatalog::build(SCHEMA).unwrap();
        assert_eq!(catalog.message_by_id(3, 12).unwrap().name, "STATUS");
        assert!(catalog.message_by_id(3, 42).is_none());
        assert!(catalog.message_by_id(99, 8).is_none());
    }

    #[test]
    fn unparseable_aircraft_id_defaults_to_zero() {
        let schema = r#"
            <c>
              <aircraft ac_id="not-a-number" name="Ghost" airframe=""/>
              <msg_class NAME="telemetry"/>
            </c>
        "#;
        let catalog = SchemaCatalog::build(schema).unwrap();
        assert_eq!(catalog.aircraft().len(), 1);
        assert_eq!(catalog.aircraft()[0].ac_id, 0);
    }

    #[test]
    fn aircraft_without_id_attribute_is_skipped() {
        let schema = r#"
            <c>
              <aircraft name="NoId" airframe=""/>
              <aircraft ac_id="5" name="Ok" airframe=""/>
              <msg_class NAME="telemetry"/>
            </c>
        "#;
        let catalog = SchemaCatalog::build(schema).unwrap();
        assert_eq!(catalog.aircraft().len(), 1);
        assert_eq!(catalog.aircraft()[0].ac_id, 5);
    }

    #[test]
    fn missing_telemetry_class_with_aircraft_is_fatal() {
        let schema = r#"
            <c>
              <aircraft ac_id="1" name="A" airframe=""/>
              <msg_class NAME="ground"/>
            </c>
        "#;
        assert!(matches!(
            SchemaCatalog::build(schema),
            Err(SchemaError::MissingTelemetryClass)
        ));
    }

    #[test]
    fn missing_telemetry_class_without_aircraft_is_trivial_catalog() {
        let schema = r#"<c><msg_class NAME="ground"/></c>"#;
        let catalog = SchemaCatalog::build(schema).unwrap();
        assert!(catalog.aircraft().is_empty());
        assert!(catalog.message_class("ground").is_some());
    }

    #[test]
    fn malformed_document_is_fatal() {
        assert!(matches!(
            SchemaCatalog::build("<configuration><aircraft"),
            Err(SchemaError::Malformed { .. })
        ));
    }

    #[test]
    fn tolerates_unescaped_special_characters() {
        let schema = r#"
            <c>
              <aircraft ac_id="3" name="Pitch & Roll" airframe="fixed<wing"/>
              <msg_class NAME="telemetry">
                <message NAME="BAT" ID="2">
                  <field NAME="volt" TYPE="float" UNIT="V">supply & backup</field>
                </message>
              </msg_class>
            </c>
        "#;
        let catalog = SchemaCatalog::build(schema).unwrap();
        let aircraft = catalog.aircraft_by_id(3).unwrap();
        assert_eq!(aircraft.name, "Pitch & Roll");
        assert_eq!(aircraft.airframe, "fixed<wing");
        let volt = catalog.message(3, "BAT").unwrap().field("volt").unwrap();
        assert_eq!(volt.description.as_deref(), Some("supply & backup"));
    }

    #[test]
    fn message_count_matches_telemetry_class_declarations() {
        let catalog = SchemaCatalog::build(SCHEMA).unwrap();
        let telemetry = catalog.message_class(TELEMETRY_CLASS).unwrap();
        for aircraft in catalog.aircraft() {
            assert_eq!(aircraft.messages.len(), telemetry.len());
        }
    }
}
