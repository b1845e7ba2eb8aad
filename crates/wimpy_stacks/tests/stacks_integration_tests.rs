//! Integration tests for the generated stacks.

use jsonschema::JSONSchema;
use serde_json::{json, Value as Json};
use wimpy_stacks::{
    build_account_template, build_application_template, build_environment_template,
    EnvironmentConfig, Stack,
};

fn resources_of_type<'a>(doc: &'a Json, resource_type: &str) -> Vec<&'a str> {
    doc["Resources"]
        .as_object()
        .unwrap()
        .iter()
        .filter(|(_, resource)| resource["Type"] == resource_type)
        .map(|(name, _)| name.as_str())
        .collect()
}

fn tag_value<'a>(resource: &'a Json, key: &str) -> &'a Json {
    resource["Properties"]["Tags"]
        .as_array()
        .unwrap()
        .iter()
        .find(|tag| tag["Key"] == key)
        .map(|tag| &tag["Value"])
        .unwrap()
}

#[test]
fn test_environment_index_five_cidrs() {
    let doc = build_environment_template(&EnvironmentConfig::new(5))
        .unwrap()
        .render();

    assert_eq!(doc["Resources"]["VPC"]["Type"], "AWS::EC2::VPC");
    assert_eq!(doc["Resources"]["VPC"]["Properties"]["CidrBlock"], "10.5.0.0/16");

    let elb_subnet = &doc["Resources"]["ELBSubnet1"]["Properties"];
    assert_eq!(elb_subnet["CidrBlock"], "10.5.32.0/20");
    assert_eq!(elb_subnet["AvailabilityZone"], "eu-west-1a");
    assert_eq!(elb_subnet["VpcId"], json!({"Ref": "VPC"}));
}

#[test]
fn test_environment_subnets_do_not_overlap() {
    let doc = build_environment_template(&EnvironmentConfig::new(12))
        .unwrap()
        .render();

    let mut cidrs: Vec<&str> = resources_of_type(&doc, "AWS::EC2::Subnet")
        .into_iter()
        .map(|name| doc["Resources"][name]["Properties"]["CidrBlock"].as_str().unwrap())
        .collect();
    assert_eq!(cidrs.len(), 9);
    cidrs.sort();
    cidrs.dedup();
    assert_eq!(cidrs.len(), 9);
    assert!(cidrs.iter().all(|cidr| cidr.starts_with("10.12.")));
}

#[test]
fn test_environment_routes_depend_on_gateway_attachment() {
    let doc = build_environment_template(&EnvironmentConfig::new(0))
        .unwrap()
        .render();

    let routes = resources_of_type(&doc, "AWS::EC2::Route");
    assert_eq!(routes, vec!["ELBRoute1", "ELBRoute2", "ELBRoute3", "AppRoute1", "AppRoute2", "AppRoute3"]);
    for name in routes {
        assert_eq!(doc["Resources"][name]["DependsOn"], json!(["InternetGatewayAttachment"]));
    }
}

#[test]
fn test_environment_outputs_and_tags() {
    let doc = build_environment_template(&EnvironmentConfig::new(3))
        .unwrap()
        .render();

    assert_eq!(
        doc["Outputs"]["DBSubnets"]["Value"],
        json!({"Fn::Join": [", ", [{"Ref": "DBSubnet1"}, {"Ref": "DBSubnet2"}, {"Ref": "DBSubnet3"}]]})
    );
    assert_eq!(
        tag_value(&doc["Resources"]["AppRouteTable2"], "Name"),
        &json!({"Fn::Join": ["-", [{"Ref": "AWS::StackName"}, "app", "eu-west-1b"]]})
    );
    assert!(doc.get("Parameters").is_none());
    assert!(doc.get("Mappings").is_none());
}

#[test]
fn test_environment_custom_zones() {
    let config = EnvironmentConfig::new(9)
        .with_availability_zones(["us-east-1a", "us-east-1b", "us-east-1c"]);
    let doc = build_environment_template(&config).unwrap().render();

    assert_eq!(doc["Resources"]["DBSubnet3"]["Properties"]["AvailabilityZone"], "us-east-1c");
    assert_eq!(doc["Resources"]["DBSubnet3"]["Properties"]["CidrBlock"], "10.9.176.0/20");
}

#[test]
fn test_application_security_groups_and_outputs() {
    let doc = build_application_template().unwrap().render();

    let groups = resources_of_type(&doc, "AWS::EC2::SecurityGroup");
    assert_eq!(
        groups,
        vec!["LoadBalancerSecurityGroup", "InstanceSecurityGroup", "DBSecurityGroup"]
    );
    assert_eq!(doc["Outputs"].as_object().unwrap().len(), 8);
    assert_eq!(doc["Parameters"].as_object().unwrap().len(), 8);

    let statements = doc["Resources"]["IAMPolicy"]["Properties"]["PolicyDocument"]["Statement"]
        .as_array()
        .unwrap();
    assert_eq!(statements.len(), 4);
}

#[test]
fn test_application_load_balancer_group_naming() {
    let doc = build_application_template().unwrap().render();
    let group = &doc["Resources"]["LoadBalancerSecurityGroup"]["Properties"];

    let expected = json!({
        "Fn::Join": ["-", [{"Ref": "Environment"}, {"Ref": "AppName"}, "elb"]]
    });
    assert_eq!(group["GroupDescription"], expected);
    assert_eq!(tag_value(&doc["Resources"]["LoadBalancerSecurityGroup"], "Name"), &expected);
    assert_eq!(group["SecurityGroupIngress"][0]["FromPort"], json!({"Ref": "ExposedPort"}));
}

#[test]
fn test_application_ssh_ingress_uses_literal_ports() {
    let doc = build_application_template().unwrap().render();
    let ingress = &doc["Resources"]["IngressForSSH"]["Properties"];
    assert_eq!(ingress["FromPort"], 22);
    assert_eq!(ingress["ToPort"], 22);
}

#[test]
fn test_account_template_shape() {
    let doc = build_account_template().unwrap().render();

    let principals = doc["Mappings"]["Principals"].as_object().unwrap();
    assert_eq!(principals.len(), 14);
    assert_eq!(doc["Mappings"]["Principals"]["eu-west-1"]["ELB"], "156460612806");

    assert_eq!(doc["Resources"]["CloudTrail"]["DependsOn"], json!(["LogPolicy"]));
    assert_eq!(
        doc["Resources"]["CloudTrail"]["Properties"]["CloudWatchLogsLogGroupArn"],
        json!({"Fn::GetAtt": ["CloudTrailLogs", "Arn"]})
    );
    assert_eq!(doc["Resources"]["CloudTrailLogs"], json!({"Type": "AWS::Logs::LogGroup"}));

    let key_statements = doc["Resources"]["MasterKey"]["Properties"]["KeyPolicy"]["Statement"]
        .as_array()
        .unwrap();
    assert_eq!(key_statements.len(), 6);

    let outputs: Vec<_> = doc["Outputs"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(outputs, vec!["LogBucket", "StorageBucket", "MasterKey"]);
}

#[test]
fn test_account_elb_log_principal_lookup() {
    let doc = build_account_template().unwrap().render();
    let statement = &doc["Resources"]["LogPolicy"]["Properties"]["PolicyDocument"]["Statement"][2];

    assert_eq!(statement["Sid"], "AWSELBLogWrite");
    assert_eq!(
        statement["Principal"],
        json!({"AWS": [{"Fn::FindInMap": ["Principals", {"Ref": "AWS::Region"}, "ELB"]}]})
    );
}

#[test]
fn test_every_stack_renders_deterministically() {
    for stack in [
        Stack::Application,
        Stack::Account,
        Stack::Environment(EnvironmentConfig::new(42)),
    ] {
        let first = stack.build().unwrap().to_json().unwrap();
        let second = stack.build().unwrap().to_json().unwrap();
        assert_eq!(first, second, "{stack}");
    }
}

#[test]
fn test_every_stack_yaml_matches_json() {
    for stack in [
        Stack::Application,
        Stack::Account,
        Stack::Environment(EnvironmentConfig::new(1)),
    ] {
        let template = stack.build().unwrap();
        let from_yaml: Json = serde_yaml::from_str(&template.to_yaml().unwrap()).unwrap();
        assert_eq!(from_yaml, template.render(), "{stack}");
    }
}

#[test]
fn test_every_stack_has_template_skeleton() {
    let schema = json!({
        "type": "object",
        "required": ["AWSTemplateFormatVersion", "Description", "Resources", "Outputs"],
        "properties": {
            "AWSTemplateFormatVersion": {"const": "2010-09-09"},
            "Resources": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "required": ["Type"],
                    "properties": {"Type": {"type": "string", "pattern": "^AWS::"}}
                }
            },
            "Outputs": {
                "type": "object",
                "additionalProperties": {"type": "object", "required": ["Description", "Value"]}
            }
        }
    });
    let compiled = JSONSchema::compile(&schema).expect("schema compiles");

    for stack in [
        Stack::Application,
        Stack::Account,
        Stack::Environment(EnvironmentConfig::new(200)),
    ] {
        let doc = stack.build().unwrap().render();
        assert!(compiled.is_valid(&doc), "{stack}");
    }
}

#[test]
fn test_template_accessors() {
    use wimpy_template::{Category, Expr, Value};

    let account = build_account_template().unwrap();
    assert_eq!(account.version(), Some("2010-09-09"));
    assert!(account.description().unwrap().contains("shared for all applications"));
    assert_eq!(
        account
            .mapping("Principals")
            .and_then(|table| table.get("us-east-2", "ELB"))
            .and_then(Value::as_str),
        Some("033677994240")
    );
    assert_eq!(account.count(Category::Mapping), 1);

    let application = build_application_template().unwrap();
    assert!(application.parameter("StorageBucketName").is_some());
    assert_eq!(
        application
            .resource("ECRRepository")
            .and_then(|r| r.property("RepositoryName"))
            .and_then(Value::as_expr),
        Some(&Expr::reference("AppName"))
    );
    assert_eq!(
        application.output("RepositoryName").map(|o| &o.value),
        Some(&Value::from(Expr::reference("ECRRepository")))
    );

    let environment = build_environment_template(&EnvironmentConfig::new(8)).unwrap();
    assert_eq!(
        environment
            .resource("VPC")
            .and_then(|r| r.property("CidrBlock"))
            .and_then(Value::as_str),
        Some("10.8.0.0/16")
    );
    assert_eq!(environment.count(Category::Parameter), 0);
}
