use fieldguard_datasets::{DatasetError, read_csv};
use pretty_assertions::assert_eq;

#[test]
fn parses_headers_and_rows() {
    let csv = "Name,Phone Number,EMAIL\nAna,555-0101,a@x.com\nBo,555-0102,b@y.com\n";
    let ds = read_csv(csv.as_bytes()).unwrap();

    assert_eq!(ds.column_names(), vec!["name", "phone_number", "email"]);
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.column("email").unwrap().get(1), Some("b@y.com"));
}

#[test]
fn empty_cells_become_missing() {
    let csv = "name,salary\nAna,\nBo,2000\n";
    let ds = read_csv(csv.as_bytes()).unwrap();
    let salary = ds.column("salary").unwrap();
    assert_eq!(salary.cells(), &[None, Some("2000".to_string())]);
}

#[test]
fn blank_header_gets_positional_name() {
    let csv = "name,,salary\nAna,x,1\n";
    let ds = read_csv(csv.as_bytes()).unwrap();
    assert_eq!(ds.column_names(), vec!["name", "column_2", "salary"]);
}

#[test]
fn quoted_fields_keep_commas() {
    let csv = "address\n\"1 Main St, Springfield\"\n";
    let ds = read_csv(csv.as_bytes()).unwrap();
    assert_eq!(ds.column("address").unwrap().get(0), Some("1 Main St, Springfield"));
}

#[test]
fn ragged_rows_fail() {
    let csv = "a,b\n1,2\n3\n";
    assert!(matches!(read_csv(csv.as_bytes()), Err(DatasetError::Csv(_))));
}

#[test]
fn duplicate_headers_fail() {
    let csv = "Email,email\na,b\n";
    assert!(matches!(
        read_csv(csv.as_bytes()),
        Err(DatasetError::DuplicateColumn(_))
    ));
}

#[test]
fn header_only_yields_empty_dataset() {
    let ds = read_csv("email,salary\n".as_bytes()).unwrap();
    assert_eq!(ds.column_count(), 2);
    assert!(ds.is_empty());
}
