//! Document metadata and the PDF/A-2b archival additions.
//!
//! Metadata values are fixed so that rendering the same record twice gives
//! identical bytes: no clock is read and no random id is generated.

use lopdf::{Dictionary, Object, StringFormat, dictionary};
use titlepress_template::DocumentMetadata;

pub const DEFAULT_TITLE: &str = "Certificate of Title";
pub const DEFAULT_AUTHOR: &str = "Land Titles Office";
pub const PRODUCER: &str = "titlepress";
pub const FIXED_DATE: &str = "D:20240101000000Z";
const FIXED_XMP_DATE: &str = "2024-01-01T00:00:00Z";
pub const OUTPUT_CONDITION: &str = "sRGB IEC61966-2.1";

/// Title and author with their defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetadata {
    pub title: String,
    pub author: String,
    pub subject: Option<String>,
    pub keywords: Option<String>,
}

impl ResolvedMetadata {
    pub fn from_template(metadata: &DocumentMetadata) -> Self {
        Self {
            title: metadata
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            author: metadata
                .author
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            subject: metadata.subject.clone(),
            keywords: metadata.keywords.clone(),
        }
    }

    pub fn info_dictionary(&self) -> Dictionary {
        let mut info = dictionary! {
            "Title" => text_string(&self.title),
            "Author" => text_string(&self.author),
            "Creator" => text_string(PRODUCER),
            "Producer" => text_string(PRODUCER),
            "CreationDate" => text_string(FIXED_DATE),
            "ModDate" => text_string(FIXED_DATE),
        };
        if let Some(subject) = &self.subject {
            info.set("Subject", text_string(subject));
        }
        if let Some(keywords) = &self.keywords {
            info.set("Keywords", text_string(keywords));
        }
        info
    }

    /// The XMP packet declaring PDF/A-2b conformance.
    pub fn xmp_packet(&self) -> String {
        let description = self
            .subject
            .as_deref()
            .map(|s| {
                format!(
                    "      <dc:description>\n        <rdf:Alt>\n          <rdf:li xml:lang='x-default'>{}</rdf:li>\n        </rdf:Alt>\n      </dc:description>\n",
                    xml_escape(s)
                )
            })
            .unwrap_or_default();
        let keywords = self
            .keywords
            .as_deref()
            .map(|k| format!("      <pdf:Keywords>{}</pdf:Keywords>\n", xml_escape(k)))
            .unwrap_or_default();

        format!(
            "<?xpacket begin='\u{FEFF}' id='W5M0MpCehiHzreSzNTczkc9d'?>
<x:xmpmeta xmlns:x='adobe:ns:meta/'>
  <rdf:RDF xmlns:rdf='http://www.w3.org/1999/02/22-rdf-syntax-ns#'>
    <rdf:Description rdf:about='' xmlns:dc='http://purl.org/dc/elements/1.1/'>
      <dc:format>application/pdf</dc:format>
      <dc:title>
        <rdf:Alt>
          <rdf:li xml:lang='x-default'>{title}</rdf:li>
        </rdf:Alt>
      </dc:title>
      <dc:creator>
        <rdf:Seq>
          <rdf:li>{author}</rdf:li>
        </rdf:Seq>
      </dc:creator>
{description}    </rdf:Description>
    <rdf:Description rdf:about='' xmlns:xmp='http://ns.adobe.com/xap/1.0/'>
      <xmp:CreatorTool>{producer}</xmp:CreatorTool>
      <xmp:CreateDate>{date}</xmp:CreateDate>
      <xmp:ModifyDate>{date}</xmp:ModifyDate>
    </rdf:Description>
    <rdf:Description rdf:about='' xmlns:pdf='http://ns.adobe.com/pdf/1.3/'>
      <pdf:Producer>{producer}</pdf:Producer>
{keywords}    </rdf:Description>
    <rdf:Description rdf:about='' xmlns:pdfaid='http://www.aiim.org/pdfa/ns/id/'>
      <pdfaid:part>2</pdfaid:part>
      <pdfaid:conformance>B</pdfaid:conformance>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
<?xpacket end='w'?>",
            title = xml_escape(&self.title),
            author = xml_escape(&self.author),
            producer = PRODUCER,
            date = FIXED_XMP_DATE,
        )
    }
}

/// The `/OutputIntents` entry referencing an embedded ICC profile.
pub fn output_intent(icc_profile: lopdf::ObjectId) -> Dictionary {
    dictionary! {
        "Type" => "OutputIntent",
        "S" => "GTS_PDFA1",
        "DestOutputProfile" => icc_profile,
        "OutputConditionIdentifier" => Object::string_literal(OUTPUT_CONDITION),
        "OutputCondition" => Object::string_literal(OUTPUT_CONDITION),
        "RegistryName" => Object::string_literal("http://www.color.org"),
        "Info" => Object::string_literal(OUTPUT_CONDITION),
    }
}

/// A PDF text string: literal bytes for ASCII, UTF-16BE with a byte order
/// mark otherwise.
pub fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
