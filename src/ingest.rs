//! Reading OpenFlights-style airport and route listings into a [`RouteGraph`].
//!
//! Lines are split on bare commas. A bad line, including one that is not
//! UTF-8, is skipped and counted; only I/O failures abort a batch.

use crate::{RecordError, RouteGraph};
use std::io::BufRead;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirportRecord {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirportStats {
    pub accepted: usize,
    pub duplicates: usize,
    pub malformed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteStats {
    pub new_routes: usize,
    pub strengthened: usize,
    pub unknown_airports: usize,
    pub malformed: usize,
}

const NAME: usize = 1;
const COUNTRY: usize = 3;
const AIRPORT_CODE: usize = 4;
const ORIGIN: usize = 2;
const DESTINATION: usize = 4;
const IATA_LEN: usize = 3;

fn field<'a>(fields: &[&'a str], index: usize) -> Result<&'a str, RecordError> {
    fields
        .get(index)
        .copied()
        .ok_or(RecordError::MissingField { index })
}

fn unquote(value: &str, index: usize) -> Result<&str, RecordError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(|| RecordError::Unquoted {
            index,
            value: value.to_string(),
        })
}

fn iata(value: &str, index: usize) -> Result<String, RecordError> {
    if value.len() != IATA_LEN {
        return Err(RecordError::BadCode {
            index,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

/// The code field must be a quoted 3-letter IATA code. The display name is
/// `"<airport>, <country>"`.
pub fn parse_airport(line: &str) -> Result<AirportRecord, RecordError> {
    let fields: Vec<_> = line.split(',').collect();
    let code = field(&fields, AIRPORT_CODE)?;
    if code.len() != IATA_LEN + 2 {
        return Err(RecordError::BadCode {
            index: AIRPORT_CODE,
            value: code.to_string(),
        });
    }
    let code = iata(unquote(code, AIRPORT_CODE)?, AIRPORT_CODE)?;
    let name = unquote(field(&fields, NAME)?, NAME)?;
    let country = unquote(field(&fields, COUNTRY)?, COUNTRY)?;
    Ok(AirportRecord {
        code,
        name: format!("{name}, {country}"),
    })
}

/// Both codes are unquoted IATA codes.
pub fn parse_route(line: &str) -> Result<RouteRecord, RecordError> {
    let fields: Vec<_> = line.split(',').collect();
    let origin = iata(field(&fields, ORIGIN)?, ORIGIN)?;
    let destination = iata(field(&fields, DESTINATION)?, DESTINATION)?;
    Ok(RouteRecord {
        origin,
        destination,
    })
}

fn decode(line: Vec<u8>) -> Result<String, RecordError> {
    let mut line = String::from_utf8(line).map_err(|_| RecordError::NotUtf8)?;
    if line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

pub fn load_airports<R: BufRead>(
    graph: &mut RouteGraph,
    reader: R,
) -> std::io::Result<AirportStats> {
    let mut stats = AirportStats::default();
    for (lineno, line) in reader.split(b'\n').enumerate() {
        let record = match decode(line?).and_then(|line| parse_airport(&line)) {
            Ok(record) => record,
            Err(err) => {
                debug!("Skipping airport line {}: {err}", lineno + 1);
                stats.malformed += 1;
                continue;
            }
        };
        match graph.add_airport(record.code, record.name) {
            Ok(_) => stats.accepted += 1,
            // add_airport only fails on a duplicate code
            Err(err) => {
                info!("Skipping airport line {}: {err}", lineno + 1);
                stats.duplicates += 1;
            }
        }
    }
    info!(
        "There were {} airports with IATA code ({} duplicates, {} skipped)",
        stats.accepted, stats.duplicates, stats.malformed
    );
    Ok(stats)
}

pub fn load_routes<R: BufRead>(
    graph: &mut RouteGraph,
    reader: R,
) -> std::io::Result<RouteStats> {
    let mut stats = RouteStats::default();
    for (lineno, line) in reader.split(b'\n').enumerate() {
        let record = match decode(line?).and_then(|line| parse_route(&line)) {
            Ok(record) => record,
            Err(err) => {
                debug!("Skipping route line {}: {err}", lineno + 1);
                stats.malformed += 1;
                continue;
            }
        };
        let known = graph.route_size();
        match graph.add_route(&record.origin, &record.destination) {
            Ok(_) if graph.route_size() > known => stats.new_routes += 1,
            Ok(_) => stats.strengthened += 1,
            Err(err) => {
                debug!("Skipping route line {}: {err}", lineno + 1);
                stats.unknown_airports += 1;
            }
        }
    }
    info!(
        "There were {} routes with IATA origins and destinations ({} repeated, {} unknown airports, {} skipped)",
        stats.new_routes, stats.strengthened, stats.unknown_airports, stats.malformed
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIRPORTS: &str = r#"1,"Goroka Airport","Goroka","Papua New Guinea","GKA","AYGA",-6.08,145.39,5282,10,"U","Pacific/Port_Moresby","airport","OurAirports"
2,"Madang Airport","Madang","Papua New Guinea","MAG","AYMD",-5.20,145.78,20,10,"U","Pacific/Port_Moresby","airport","OurAirports"
5,"Port Moresby Jacksons International Airport","Port Moresby","Papua New Guinea","POM","AYPY",-9.44,147.22,146,10,"U","Pacific/Port_Moresby","airport","OurAirports"
7,"Narsarsuaq Airport","Narssarssuaq","Greenland",\N,"BGBW",61.16,-45.42,112,-3,"E","America/Godthab","airport","OurAirports"
9,"Goroka Again","Goroka","Papua New Guinea","GKA","AYGA",-6.08,145.39,5282,10,"U","Pacific/Port_Moresby","airport","OurAirports"
garbage"#;

    const ROUTES: &str = "2B,410,GKA,2965,MAG,2990,,0,CR2
2B,410,GKA,2965,MAG,2990,,0,CR2
3K,411,MAG,2966,POM,2991,,0,320
3K,411,POM,2966,XXX,2991,,0,320
4M,412,GKAX,1,POM,2,,0,CR2
short";

    #[test]
    fn airport_line() {
        let line = r#"1,"Goroka Airport","Goroka","Papua New Guinea","GKA","AYGA",-6.08,145.39"#;
        let record = parse_airport(line).unwrap();
        assert_eq!(record.code, "GKA");
        assert_eq!(record.name, "Goroka Airport, Papua New Guinea");
    }

    #[test]
    fn airport_line_without_iata() {
        let line = r#"7,"Narsarsuaq Airport","Narssarssuaq","Greenland",\N,"BGBW""#;
        assert_eq!(
            parse_airport(line),
            Err(RecordError::BadCode {
                index: AIRPORT_CODE,
                value: r"\N".to_string()
            })
        );
        assert_eq!(
            parse_airport("1,2,3"),
            Err(RecordError::MissingField {
                index: AIRPORT_CODE
            })
        );
    }

    #[test]
    fn airport_fields_must_be_quoted() {
        let line = r#"1,Goroka Airport,"Goroka","Papua New Guinea","GKA","AYGA""#;
        assert_eq!(
            parse_airport(line),
            Err(RecordError::Unquoted {
                index: NAME,
                value: "Goroka Airport".to_string()
            })
        );
        let line = r#"1,"Goroka Airport","Goroka","Papua New Guinea",'GKA',"AYGA""#;
        assert!(matches!(
            parse_airport(line),
            Err(RecordError::Unquoted {
                index: AIRPORT_CODE,
                ..
            })
        ));
        let line = r#"1,"","Goroka","","GKA","AYGA""#;
        assert_eq!(parse_airport(line).unwrap().name, ", ");
    }

    #[test]
    fn route_line() {
        let record = parse_route("2B,410,AER,2965,KZN,2990,,0,CR2").unwrap();
        assert_eq!(record.origin, "AER");
        assert_eq!(record.destination, "KZN");
        assert!(matches!(
            parse_route("2B,410,AERO,2965,KZN"),
            Err(RecordError::BadCode { index: ORIGIN, .. })
        ));
        assert!(matches!(
            parse_route("2B,410,AER,2965,\\N"),
            Err(RecordError::BadCode {
                index: DESTINATION,
                ..
            })
        ));
        assert_eq!(
            parse_route("2B,410,AER"),
            Err(RecordError::MissingField { index: DESTINATION })
        );
    }

    #[test]
    fn load_batches() {
        let mut g = RouteGraph::new();
        let stats = load_airports(&mut g, AIRPORTS.as_bytes()).unwrap();
        assert_eq!(
            stats,
            AirportStats {
                accepted: 3,
                duplicates: 1,
                malformed: 2,
            }
        );
        let gka = g.find("GKA").unwrap();
        assert_eq!(g.airport(gka).name(), "Goroka Airport, Papua New Guinea");

        let stats = load_routes(&mut g, ROUTES.as_bytes()).unwrap();
        assert_eq!(
            stats,
            RouteStats {
                new_routes: 2,
                strengthened: 1,
                unknown_airports: 1,
                malformed: 2,
            }
        );
        assert_eq!(g.find_route("GKA", "MAG").unwrap().weight(), 2);
        assert_eq!(g.airport(gka).out_weight(), 2);
        assert!(g.airport(g.find("POM").unwrap()).is_sink());
    }

    #[test]
    fn bad_bytes_skip_one_line() {
        let mut batch = Vec::new();
        let mut lines = AIRPORTS.lines();
        batch.extend_from_slice(lines.next().unwrap().as_bytes());
        batch.extend_from_slice(b"\r\n3,\"Mount Hagen \xff\",\"Mount Hagen\",\"PNG\",\"HGU\",\"AYMH\"\n");
        batch.extend_from_slice(lines.nth(1).unwrap().as_bytes());
        batch.push(b'\n');

        let mut g = RouteGraph::new();
        let stats = load_airports(&mut g, batch.as_slice()).unwrap();
        assert_eq!(
            stats,
            AirportStats {
                accepted: 2,
                duplicates: 0,
                malformed: 1,
            }
        );
        assert!(g.find("GKA").is_some());
        assert!(g.find("POM").is_some());
        assert!(g.find("HGU").is_none());

        let routes = b"2B,410,GKA,2965,POM,2990,,0,CR2\n\xfe\xff,,,\r\n2B,410,POM,2965,GKA,2990,,0,CR2\r\n";
        let stats = load_routes(&mut g, &routes[..]).unwrap();
        assert_eq!(
            stats,
            RouteStats {
                new_routes: 2,
                strengthened: 0,
                unknown_airports: 0,
                malformed: 1,
            }
        );
        assert!(g.find_route("POM", "GKA").is_some());
    }

    #[test]
    fn read_failure_aborts_batch() {
        struct Broken;
        impl std::io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk gone"))
            }
        }
        let mut g = RouteGraph::new();
        let err = load_airports(&mut g, std::io::BufReader::new(Broken)).unwrap_err();
        assert_eq!(err.to_string(), "disk gone");
    }
}
