//! The three metadata queries the explorer runs at startup.

use std::fmt;

use lfi_model::Lang;

const LANG_PLACEHOLDER: &str = "{lang}";

/// Cubes of the NFI graph with their key and measure dimensions.
/// Columns: `?cube ?cubeName ?dimName ?dimPath ?dimType`.
const PROPERTIES_FOR_CUBES: &str = r#"
PREFIX meta: <https://cube.link/meta/>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
PREFIX sh: <http://www.w3.org/ns/shacl#>
PREFIX schema: <http://schema.org/>
PREFIX cube: <https://cube.link/>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
SELECT DISTINCT ?cube ?cubeName ?dimName ?dimPath ?dimType WHERE {
  GRAPH <https://lindas.admin.ch/foen/nfi> {
    ?cube a cube:Cube ;
      schema:name ?cubeName ;
      cube:observationConstraint ?shape .
    FILTER NOT EXISTS { ?cube schema:expires ?ex . }
    ?shape sh:property ?dim .
    ?dim schema:name ?dimName ;
      sh:path ?dimPath ;
      rdf:type ?dimType .
    FILTER(LANG(?dimName) = "{lang}")
    FILTER(LANG(?cubeName) = "{lang}")
    FILTER(?dimPath NOT IN (cube:observedBy, <https://environment.ld.admin.ch/foen/nfi/inventory>, <https://environment.ld.admin.ch/foen/nfi/unitOfReference>))
    FILTER(?cube NOT IN (<https://environment.ld.admin.ch/foen/nfi/nfi_T-changes/cube/2024-1>))
  }
}
ORDER BY ?dimName
LIMIT 10000
"#;

/// Members of every key dimension. Columns: `?dimPath ?dimName ?value ?valueName`.
const PROPERTIES_OPTIONS: &str = r#"
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
PREFIX sh: <http://www.w3.org/ns/shacl#>
PREFIX schema: <http://schema.org/>
PREFIX cube: <https://cube.link/>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
SELECT DISTINCT ?dimPath ?dimName ?value ?valueName
FROM <https://lindas.admin.ch/foen/nfi>
FROM <https://lindas.admin.ch/cube/dimension>
WHERE {
  ?cube a cube:Cube ;
    cube:observationConstraint ?shape .
  FILTER NOT EXISTS { ?cube schema:expires ?ex . }
  ?shape sh:property ?dim .
  ?dim schema:name ?dimName ;
    sh:path ?dimPath ;
    rdf:type ?dimType ;
    sh:in/rdf:rest*/rdf:first ?value .
  ?value schema:name ?valueName .
  FILTER (LANGMATCHES(LANG(?valueName), "{lang}"))
  FILTER (LANGMATCHES(LANG(?dimName), "{lang}"))
  FILTER(?dimType = cube:KeyDimension)
  FILTER(?dimPath NOT IN (cube:observedBy))
  FILTER(?cube NOT IN (<https://environment.ld.admin.ch/foen/nfi/nfi_T-changes/cube/2024-1>))
}
ORDER BY ?dimPath
LIMIT 10000
"#;

/// Regions of the `unitOfReference` hierarchy grouped by region type; regions without a group
/// fall into `schema:Country`. Columns: `?value ?valueName ?type ?typeName`.
const REGION_HIERARCHY: &str = r#"
PREFIX meta: <https://cube.link/meta/>
PREFIX dcterms: <http://purl.org/dc/terms/>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
PREFIX sh: <http://www.w3.org/ns/shacl#>
PREFIX schema: <http://schema.org/>
PREFIX cube: <https://cube.link/>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
SELECT DISTINCT ?value ?valueName ?type ?typeName
WHERE {
  GRAPH <https://lindas.admin.ch/foen/nfi> {
    { SELECT DISTINCT ?value ?root WHERE {
      FILTER NOT EXISTS { ?cube schema:expires ?ex . }
      ?cube a cube:Cube ;
            cube:observationConstraint ?shape .
      ?shape sh:property ?dim .
      ?dim sh:path <https://environment.ld.admin.ch/foen/nfi/unitOfReference> ;
           meta:inHierarchy/meta:hierarchyRoot ?root ;
           sh:in/rdf:rest*/rdf:first ?value .
    }}
    OPTIONAL {
      ?value ^schema:about ?group .
      ?group <https://environment.ld.admin.ch/foen/nfi/subjectOf> ?root ;
             schema:name ?groupName .
      FILTER (langMatches(lang(?groupName), "{lang}"))
    }
  }
  ?value schema:name ?valueName .
  FILTER (langMatches(lang(?valueName), "{lang}"))
  BIND (COALESCE(?groupName, ?valueName) AS ?typeName)
  BIND (COALESCE(?group, schema:Country) AS ?type)
}
ORDER BY ?type ?valueName
LIMIT 1000
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    PropertiesForCubes,
    PropertiesOptions,
    RegionHierarchy,
}

impl Query {
    pub const ALL: [Query; 3] = [
        Query::PropertiesForCubes,
        Query::PropertiesOptions,
        Query::RegionHierarchy,
    ];

    /// Short name; also the fixture file stem.
    pub fn name(self) -> &'static str {
        match self {
            Query::PropertiesForCubes => "properties",
            Query::PropertiesOptions => "options",
            Query::RegionHierarchy => "regions",
        }
    }

    /// Query text with labels restricted to `lang`.
    pub fn sparql(self, lang: Lang) -> String {
        let template = match self {
            Query::PropertiesForCubes => PROPERTIES_FOR_CUBES,
            Query::PropertiesOptions => PROPERTIES_OPTIONS,
            Query::RegionHierarchy => REGION_HIERARCHY,
        };
        template.replace(LANG_PLACEHOLDER, lang.code())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
